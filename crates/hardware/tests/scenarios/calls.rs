//! Calls, returns and unconditional jumps.

use crate::common::harness::TestBench;
use pretty_assertions::assert_eq;

#[test]
fn jump_redirects_and_discards_the_wrong_path() {
    let mut bench = TestBench::new(
        "MOVC R1,4016\n\
         JUMP R1,#0\n\
         MOVC R2,1\n\
         HALT\n\
         MOVC R3,5\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(2), 0, "instruction behind JUMP must not commit");
    assert_eq!(bench.arf(3), 5);
}

#[test]
fn call_and_return_without_prediction() {
    // JAL's base register is elided in assembly, so the target is the
    // absolute immediate. The link value returns through RET.
    let mut bench = TestBench::new(
        "MOVC R1,10\n\
         JAL R5,#4024\n\
         MOVC R2,20\n\
         HALT\n\
         NOP\n\
         NOP\n\
         MOVC R3,30\n\
         RET R5\n",
    );
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(1), 10);
    assert_eq!(bench.arf(3), 30, "subroutine body ran");
    assert_eq!(bench.arf(2), 20, "execution resumed at the link address");
    assert_eq!(bench.arf(5), 4008, "link register holds pc+4");
    assert_eq!(bench.retired(), 6);
}

#[test]
fn pc_relative_call_links_and_returns() {
    let mut bench = TestBench::new(
        "JALP R5,#16\n\
         MOVC R2,2\n\
         HALT\n\
         NOP\n\
         MOVC R3,3\n\
         RET R5\n",
    );
    bench.run_to_halt();

    assert_eq!(bench.arf(3), 3);
    assert_eq!(bench.arf(2), 2);
    assert_eq!(bench.arf(5), 4004);
}

#[test]
fn predicted_return_restores_rap_depth() {
    // Correct-prediction path: the call pushes the link address, the
    // return pops it at fetch and resolves to the same target. No effect
    // is lost or duplicated, and the RAP ends at its pre-call depth.
    let mut bench = TestBench::with_predictor(
        "MOVC R1,10\n\
         JAL R5,#4024\n\
         MOVC R2,20\n\
         HALT\n\
         NOP\n\
         NOP\n\
         MOVC R3,30\n\
         RET R5\n",
    );
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(1), 10);
    assert_eq!(bench.arf(2), 20);
    assert_eq!(bench.arf(3), 30);
    assert_eq!(bench.arf(5), 4008);
    assert_eq!(bench.retired(), 6);
    assert_eq!(bench.sim.cpu.rap.depth(), 0, "push balanced by the pop");
    assert!(bench.sim.cpu.stats.rap_hits >= 1);
}
