//! CLI driver: parse one assembly source file and print a cycle-cost
//! listing for the selected CPU model.

use m68k_cycles::cpu_model::CpuModel;
use m68k_cycles::error::Error;
use m68k_cycles::model020::Model020;
use m68k_cycles::model060::Model060;
use m68k_cycles::parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Model {
    M68020,
    M68060,
}

fn parse_model(text: &str) -> Result<Model, Error> {
    let digits = text.trim_start_matches('-');
    let mut n: i32 = digits
        .parse()
        .map_err(|_| Error::invariant("model flag is not numeric"))?;
    if n < 68000 {
        n += 68000;
    }
    match n {
        68020 => Ok(Model::M68020),
        68060 => Ok(Model::M68060),
        _ => Err(Error::unsupported(format!("Unsupported CPU model {digits}"))),
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} [-68020/-68060] source")
}

fn run() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("m68k-cycles", String::as_str).to_string();

    let mut model = Model::M68060;
    let mut rest = &args[1..];
    if let Some(first) = rest.first() {
        if first.starts_with('-') {
            model = parse_model(first)?;
            rest = &rest[1..];
        }
    }
    let [source_path] = rest else {
        eprintln!("{}", usage(&program));
        std::process::exit(1);
    };

    tracing::info!(path = %source_path, ?model, "parsing source");
    let text = std::fs::read_to_string(source_path).map_err(|e| Error::unsupported(format!("could not open {source_path}: {e}")))?;
    let instructions = parser::parse_program(&text)?;

    let instruction_words: u32 = instructions.iter().map(m68k_cycles::Instruction::num_words).sum();

    match model {
        Model::M68060 => {
            let mut cpu = Model060::new();
            cpu.simulate(&instructions, 1, true)?;
            let res = cpu.simulate(&instructions, 100, false)?;
            println!("Instruction words in loop: {instruction_words}, {res} cycles/iteration");
        }
        Model::M68020 => {
            let mut cpu = Model020::new();
            cpu.simulate(&instructions, 0, true)?;
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
