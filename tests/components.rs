// tests/components.rs
use tomasulo_rust::components::common_data_bus::CommonDataBus;
use tomasulo_rust::components::functional_unit::{FunctionalUnits, UnitKind};
use tomasulo_rust::components::instruction::{Instruction, Opcode};
use tomasulo_rust::components::memory::Memory;
use tomasulo_rust::components::register_file::RegisterFile;
use tomasulo_rust::components::reservation_station::{ReservationStations, StationKind};
use tomasulo_rust::errors::SimulatorError;

#[test]
fn test_register_file_initial_state() {
    let registers = RegisterFile::new(8);

    assert_eq!(registers.values.len(), 8);
    assert_eq!(registers.values[0], 0, "R0 must start at 0");
    for (index, value) in registers.values.iter().enumerate().skip(1) {
        assert!(
            (1..=100).contains(value),
            "R{} initialised to {} outside 1..=100",
            index,
            value
        );
    }
    assert!(registers.status.iter().all(|status| status.is_none()));
}

#[test]
fn test_register_file_seeded_determinism() {
    let a = RegisterFile::with_seed(8, 1234);
    let b = RegisterFile::with_seed(8, 1234);
    assert_eq!(a.values, b.values);

    let c = RegisterFile::with_seed(8, 1235);
    assert_ne!(a.values, c.values, "different seeds should diverge");
}

#[test]
fn test_register_file_read_write() {
    let mut registers = RegisterFile::with_seed(8, 0);

    registers.write("R3", 77).unwrap();
    assert_eq!(registers.read("R3").unwrap(), 77);

    // No hardware-zero special case: R0 is writable
    registers.write("R0", 5).unwrap();
    assert_eq!(registers.read("R0").unwrap(), 5);
}

#[test]
fn test_register_file_rejects_bad_names() {
    let registers = RegisterFile::with_seed(8, 0);

    match registers.read("RX") {
        Err(SimulatorError::InvalidRegisterName(name)) => assert_eq!(name, "RX"),
        other => panic!("expected InvalidRegisterName, got {:?}", other),
    }

    match registers.read("R99") {
        Err(SimulatorError::RegisterOutOfRange(index)) => assert_eq!(index, 99),
        other => panic!("expected RegisterOutOfRange, got {:?}", other),
    }

    assert!(registers.read("X1").is_err());
    assert!(registers.read("").is_err());
}

#[test]
fn test_register_file_status_tracking() {
    let mut registers = RegisterFile::with_seed(8, 0);

    assert!(registers.is_available("R2").unwrap());
    registers.set_status("R2", Some("ALU1".to_string())).unwrap();
    assert_eq!(registers.get_status("R2").unwrap().as_deref(), Some("ALU1"));
    assert!(!registers.is_available("R2").unwrap());

    registers.set_status("R2", None).unwrap();
    assert!(registers.is_available("R2").unwrap());
}

#[test]
fn test_memory_read_write() {
    let mut memory = Memory::new(1024);
    assert_eq!(memory.size(), 1024);

    memory.write(10, -42);
    assert_eq!(memory.read(10), -42);
    assert_eq!(memory.read(11), 0, "untouched words read as zero");
}

#[test]
fn test_memory_soft_out_of_bounds() {
    let mut memory = Memory::new(64);

    // Reads degrade to zero
    assert_eq!(memory.read(64), 0);
    assert_eq!(memory.read(-1), 0);

    // Writes are dropped without corrupting anything
    memory.write(64, 9);
    memory.write(-5, 9);
    assert!(memory.data.iter().all(|&word| word == 0));
}

#[test]
fn test_cdb_single_slot() {
    let mut cdb = CommonDataBus::new();
    assert!(!cdb.busy);

    assert!(cdb.broadcast("ALU1", Some(12)));
    assert!(cdb.busy);
    assert_eq!(cdb.producer.as_deref(), Some("ALU1"));
    assert_eq!(cdb.value, Some(12));

    // Second broadcast in the same cycle is refused
    assert!(!cdb.broadcast("MUL1", Some(99)));
    assert_eq!(cdb.producer.as_deref(), Some("ALU1"));

    cdb.clear();
    assert!(!cdb.busy);
    assert!(cdb.producer.is_none());
    assert!(cdb.broadcast("MUL1", None), "STORE broadcasts carry no value");
    assert_eq!(cdb.value, None);
}

#[test]
fn test_station_pool_layout_and_dispatch() {
    let mut stations = ReservationStations::new(3, 2, 2, 2);
    assert_eq!(stations.stations.len(), 9);

    // Stable pool order: first free station of the matching class
    assert_eq!(stations.get_available(Opcode::Add).unwrap().name, "ALU1");
    stations.get_mut_by_tag("ALU1").unwrap().busy = true;
    assert_eq!(stations.get_available(Opcode::Sub).unwrap().name, "ALU2");

    // Class separation
    assert_eq!(stations.get_available(Opcode::Mul).unwrap().name, "MUL1");
    assert_eq!(stations.get_available(Opcode::Load).unwrap().name, "LOAD1");
    assert_eq!(stations.get_available(Opcode::Store).unwrap().name, "STORE1");

    // Exhaustion
    for tag in ["MUL1", "MUL2"] {
        stations.get_mut_by_tag(tag).unwrap().busy = true;
    }
    assert!(stations.get_available(Opcode::Div).is_none());
    assert!(!stations.all_free());
}

#[test]
fn test_station_kind_accepts() {
    assert!(StationKind::Alu.accepts(Opcode::Add));
    assert!(StationKind::Alu.accepts(Opcode::Sub));
    assert!(!StationKind::Alu.accepts(Opcode::Mul));
    assert!(StationKind::MulDiv.accepts(Opcode::Div));
    assert!(!StationKind::MulDiv.accepts(Opcode::Load));
    assert!(StationKind::LoadBuffer.accepts(Opcode::Load));
    assert!(!StationKind::LoadBuffer.accepts(Opcode::Store));
    assert!(StationKind::StoreBuffer.accepts(Opcode::Store));
}

#[test]
fn test_station_snoop_captures_pending_operands() {
    let mut stations = ReservationStations::new(3, 2, 2, 2);

    {
        let station = stations.get_mut_by_tag("ALU2").unwrap();
        station.busy = true;
        station.op = Some(Opcode::Sub);
        station.qj = Some("ALU1".to_string());
        station.qk = Some("MUL1".to_string());
    }

    stations.broadcast("ALU1", Some(12));

    let station = stations.get_by_tag("ALU2").unwrap();
    assert_eq!(station.vj, Some(12));
    assert!(station.qj.is_none());
    assert_eq!(station.qk.as_deref(), Some("MUL1"), "unrelated tag untouched");
    assert!(!station.is_ready(), "still waiting on the second operand");

    stations.broadcast("MUL1", Some(3));
    assert!(stations.get_by_tag("ALU2").unwrap().is_ready());
}

#[test]
fn test_unit_pool_layout_and_dispatch() {
    let mut units = FunctionalUnits::new(2, 1, 1);
    assert_eq!(units.units.len(), 4);

    assert_eq!(units.get_available(Opcode::Add).unwrap().name, "ALU1");
    assert_eq!(units.get_available(Opcode::Mul).unwrap().name, "MULDIV1");
    assert_eq!(units.get_available(Opcode::Load).unwrap().name, "LOADSTORE1");

    units.units[0].start_execution("ALU1".to_string(), 2);
    assert_eq!(
        units.get_available(Opcode::Add).unwrap().name,
        "ALU2",
        "busy unit skipped in traversal order"
    );

    assert!(units.units[0].kind == UnitKind::Alu);
    assert!(!units.units[0].can_accept(Opcode::Add), "busy unit refuses work");
}

#[test]
fn test_unit_countdown_and_compute() {
    let mut units = FunctionalUnits::new(2, 1, 1);
    let mut stations = ReservationStations::new(3, 2, 2, 2);
    let mut memory = Memory::new(64);

    {
        let station = stations.get_mut_by_tag("ALU1").unwrap();
        station.busy = true;
        station.op = Some(Opcode::Add);
        station.vj = Some(2);
        station.vk = Some(3);
        station.executing = true;
        station.cycles_left = 2;
    }
    units.units[0].start_execution("ALU1".to_string(), 2);

    let results = units.tick(&mut stations, &mut memory).unwrap();
    assert!(results.is_empty(), "latency not yet elapsed");
    assert_eq!(stations.get_by_tag("ALU1").unwrap().cycles_left, 1);

    let results = units.tick(&mut stations, &mut memory).unwrap();
    assert_eq!(results, vec![("ALU1".to_string(), Some(5))]);
    assert!(!units.units[0].busy, "unit released after completion");
    assert!(!stations.get_by_tag("ALU1").unwrap().executing);
}

#[test]
fn test_store_unit_writes_memory_and_returns_no_value() {
    let mut units = FunctionalUnits::new(2, 1, 1);
    let mut stations = ReservationStations::new(3, 2, 2, 2);
    let mut memory = Memory::new(64);

    {
        let station = stations.get_mut_by_tag("STORE1").unwrap();
        station.busy = true;
        station.op = Some(Opcode::Store);
        station.vj = Some(0);
        station.vk = Some(99);
        station.address = Some(8);
        station.executing = true;
        station.cycles_left = 1;
    }
    units.units[3].start_execution("STORE1".to_string(), 1);

    let results = units.tick(&mut stations, &mut memory).unwrap();
    assert_eq!(results, vec![("STORE1".to_string(), None)]);
    assert_eq!(memory.read(8), 99);
}

#[test]
fn test_instruction_display_forms() {
    let add = Instruction::arithmetic(Opcode::Add, "R4", "R1", "R2");
    assert_eq!(add.to_string(), "ADD R4, R1, R2");

    let load = Instruction::load("R1", -4, "R2");
    assert_eq!(load.to_string(), "LOAD R1, -4(R2)");

    let store = Instruction::store(16, "R0", "R7");
    assert_eq!(store.to_string(), "STORE 16(R0), R7");

    assert!(add.is_arithmetic());
    assert!(!add.is_memory_op());
    assert!(load.is_memory_op());
    assert!(store.dest.is_none(), "STORE has no destination register");
}
