//! A small interactive front end: parses each line into a node tree, folds it, and prints the
//! rendered form together with its canonical serialization.

use ariadne::Source;
use braket_compute::ctxt::Ctxt;
use braket_compute::node::builder;
use braket_compute::rewrite::fold::fold;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::{self, IsTerminal, Read};

/// Parses, folds, and prints one input, reporting failures to stderr.
fn process(input: &str, ctxt: &mut Ctxt) {
    match builder::parse(input, ctxt) {
        Ok(tree) => {
            let folded = fold(&tree);
            println!("{}", folded);
            match folded.to_json() {
                Ok(json) => println!("{}", json),
                Err(err) => eprintln!("{}", err),
            }
        },
        Err(err) => {
            err.build_report("input")
                .eprint(("input", Source::from(input)))
                .unwrap();
        },
    }
}

fn main() {
    let mut ctxt = Ctxt::in_memory();

    if !io::stdin().is_terminal() {
        // read one formula per line from stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).unwrap();
        for line in input.lines().filter(|line| !line.trim().is_empty()) {
            process(line, &mut ctxt);
        }
        return;
    }

    // interactive mode
    let mut rl = DefaultEditor::new().unwrap();

    fn process_line(rl: &mut DefaultEditor, ctxt: &mut Ctxt) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        process(&input, ctxt);
        Ok(())
    }

    loop {
        if let Err(err) = process_line(&mut rl, &mut ctxt) {
            match err {
                ReadlineError::Eof | ReadlineError::Interrupted => (),
                _ => eprintln!("{}", err),
            }
            break;
        }
    }
}
