// Drives the library the way an embedding program would: custom backends, no stdio.
use brainfrick::{
    BracketStrategy, BrainfuckError, Cell, Interpreter, IterSource, Machine, Program, SinkError,
    SourceError, WriterSink,
};

#[test]
fn hello_world_through_a_writer() {
    let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
    let machine =
        Machine::with_io(8, IterSource::new(Vec::new()), WriterSink::new(Vec::new())).unwrap();
    let mut bf = Interpreter::new(machine);
    bf.interpret(&Program::parse(code)).unwrap();

    let (_, sink) = bf.into_machine().into_io();
    assert_eq!(sink.into_inner(), b"Hello World!\n");
}

#[test]
fn skipped_loop_never_touches_io() {
    let input = || -> Result<Cell, SourceError> { panic!("input must not be read") };
    let output = |_: Cell| -> Result<(), SinkError> { panic!("output must not be written") };
    for strategy in [BracketStrategy::Scan, BracketStrategy::JumpTable] {
        let machine = Machine::with_io(4, input, output).unwrap();
        let mut bf = Interpreter::new(machine).with_strategy(strategy);
        bf.interpret(&Program::parse(">[,.[,.]>+<,.]+")).unwrap();
        assert_eq!(bf.machine().cells(), &[0, 1, 0, 0]);
    }
}

#[test]
fn cat_program_copies_input_until_exhausted() {
    let machine = Machine::with_io(2, IterSource::from_text("echo"), String::new()).unwrap();
    let mut bf = Interpreter::new(machine);
    let result = bf.interpret(&Program::parse(",[.,]"));

    // Exhaustion is an error, reported at the ',' inside the loop.
    assert!(matches!(result, Err(BrainfuckError::InputExhausted { ip: 3 })));
    assert_eq!(bf.machine().sink(), "echo");
}

#[test]
fn tape_persists_between_runs_until_reset() {
    let machine = Machine::with_io(2, IterSource::new(Vec::new()), Vec::<Cell>::new()).unwrap();
    let mut bf = Interpreter::new(machine);
    let program = Program::parse("+>++");
    bf.interpret(&program).unwrap();
    // The second run starts on cell 1, where the first one stopped.
    bf.interpret(&program).unwrap();
    assert_eq!(bf.machine().cells(), &[1, 5]);

    bf.machine_mut().reset();
    bf.interpret(&program).unwrap();
    assert_eq!(bf.machine().cells(), &[1, 2]);
}
