//! Load/store scenarios through the LSQ and memory unit.

use crate::common::harness::TestBench;
use pretty_assertions::assert_eq;

#[test]
fn load_and_store_commit_in_program_order() {
    let mut bench = TestBench::new(
        "MOVC R1,0\n\
         LOAD R2,R1,#0\n\
         MOVC R3,99\n\
         STORE R3,R1,#4\n\
         HALT\n",
    );
    bench.sim.set_memory(0, 42);
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(2), 42);
    assert_eq!(bench.mem(4), 99);
}

#[test]
fn store_then_load_same_address() {
    // The load issues only after the store has left the LSQ head, so it
    // must observe the stored value.
    let mut bench = TestBench::new(
        "MOVC R1,8\n\
         MOVC R2,1234\n\
         STORE R2,R1,#0\n\
         LOAD R3,R1,#0\n\
         HALT\n",
    );
    bench.run_to_halt();
    assert_eq!(bench.arf(3), 1234);
}

#[test]
fn negative_offsets_address_backwards() {
    let mut bench = TestBench::new(
        "MOVC R1,100\n\
         LOAD R2,R1,#-4\n\
         HALT\n",
    );
    bench.sim.set_memory(96, -5);
    bench.run_to_halt();
    assert_eq!(bench.arf(2), -5);
}

#[test]
fn store_waits_for_multiplied_data() {
    // The store's data register is produced by a multiply; the store cannot
    // issue until the product has been forwarded to its station entry.
    let mut bench = TestBench::new(
        "MOVC R1,16\n\
         MOVC R2,6\n\
         MOVC R3,7\n\
         MUL R4,R2,R3\n\
         STORE R4,R1,#0\n\
         HALT\n",
    );
    bench.run_to_halt();
    assert_eq!(bench.mem(16), 42);
}
