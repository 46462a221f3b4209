// tests/error_handling.rs
use tomasulo_rust::errors::SimulatorError;
use tomasulo_rust::simulator::config::SimulatorConfig;
use tomasulo_rust::simulator::simulator::Simulator;
use tomasulo_rust::utils::parser;

fn setup_simulator(trace: &str) -> Simulator {
    let mut simulator = Simulator::with_seed(SimulatorConfig::default(), 42);
    let num_registers = simulator.config.num_registers;
    simulator.registers.values = vec![0; num_registers];
    simulator.registers.values[1] = 5;
    simulator.registers.values[2] = 7;
    simulator.load_program(parser::parse_str(trace));
    simulator
}

#[test]
fn test_invalid_register_name_is_fatal() {
    // "RX" parses as a register-shaped token; the register file rejects it
    // at issue time.
    let mut simulator = setup_simulator("ADD RX, R1, R2");

    match simulator.run() {
        Err(SimulatorError::InvalidRegisterName(name)) => assert_eq!(name, "RX"),
        other => panic!(
            "expected InvalidRegisterName, got {:?}",
            other.map(|r| r.total_cycles)
        ),
    }
}

#[test]
fn test_out_of_range_register_is_fatal() {
    let mut simulator = setup_simulator("ADD R99, R1, R2");

    match simulator.run() {
        Err(SimulatorError::RegisterOutOfRange(index)) => assert_eq!(index, 99),
        other => panic!(
            "expected RegisterOutOfRange, got {:?}",
            other.map(|r| r.total_cycles)
        ),
    }
}

#[test]
fn test_out_of_range_load_degrades_to_zero() {
    // Memory is 1024 words; 2000 is out of range, so the LOAD warns and
    // returns zero instead of failing the run.
    let mut simulator = setup_simulator("LOAD R4, 2000(R0)");
    simulator.registers.values[4] = 123;

    let report = simulator.run().expect("soft failure must not abort");

    assert_eq!(simulator.registers.read("R4").unwrap(), 0);
    assert_eq!(report.completed_instructions, 1);
}

#[test]
fn test_out_of_range_store_is_dropped() {
    let mut simulator = setup_simulator("STORE -10(R0), R1");

    let report = simulator.run().expect("soft failure must not abort");

    assert!(simulator.memory.data.iter().all(|&word| word == 0));
    assert_eq!(report.completed_instructions, 1);
}

#[test]
fn test_divide_by_zero_warns_and_continues() {
    let mut simulator = setup_simulator("DIV R4, R2, R0\nADD R5, R1, R2");

    let report = simulator.run().expect("soft failure must not abort");

    assert_eq!(simulator.registers.read("R4").unwrap(), 0);
    assert_eq!(simulator.registers.read("R5").unwrap(), 12);
    assert_eq!(report.completed_instructions, 2);
}

#[test]
fn test_cdb_collision_drops_one_completion() {
    // Both SUBs wait on the ADD, so the broadcast releases them into the
    // two ALU units in the same cycle and they finish together. One wins
    // the CDB; the other is dropped, falls back to ready, and re-executes.
    let trace = "ADD R4, R1, R2\nSUB R5, R4, R1\nSUB R6, R4, R2";
    let mut simulator = setup_simulator(trace);

    let report = simulator.run().expect("simulation failed");

    assert_eq!(
        report.completed_instructions, 3,
        "dropped completion must retry"
    );
    assert_eq!(simulator.registers.read("R5").unwrap(), 7);
    assert_eq!(simulator.registers.read("R6").unwrap(), 5);

    // The loser retired strictly after the winner
    let first = simulator.instructions[1].write_result_cycle.unwrap();
    let second = simulator.instructions[2].write_result_cycle.unwrap();
    assert!(second > first, "collision must serialise completions");
}

#[test]
fn test_simulator_survives_noisy_trace() {
    // A trace of soft failures end to end: bad lines, out-of-range memory,
    // divide by zero. The run completes with whatever survived parsing.
    let trace = "\
ADD R4, R1, R2
BOGUS LINE
LOAD R5, 4000(R0)
DIV R6, R1, R0
";
    let mut simulator = setup_simulator(trace);

    let report = simulator
        .run()
        .expect("user traces must not crash the simulator");

    assert_eq!(report.total_instructions, 3, "bad line shrinks the program");
    assert_eq!(report.completed_instructions, 3);
    assert_eq!(simulator.registers.read("R5").unwrap(), 0);
    assert_eq!(simulator.registers.read("R6").unwrap(), 0);
}
