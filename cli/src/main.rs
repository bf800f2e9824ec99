#[macro_use]
extern crate clap;

use clap::{App, Arg, SubCommand};
use octo::{Image, Opcode};
use std::fs;
use std::path::Path;
use std::process;

#[derive(Debug)]
enum Error {
    Io(std::io::Error, String),
    Compile(lang::CompileError),
    Assemble(asm::AssembleError),
    Interpret(octo::InterpretError),
    Harness(harness::HarnessError),
    UnknownExtension(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, path) => write!(f, "{}: {}", path, err),
            Error::Compile(err) => write!(f, "{}", err),
            Error::Assemble(err) => write!(f, "{}", err),
            Error::Interpret(err) => write!(f, "{}", err),
            Error::Harness(err) => write!(f, "{}", err),
            Error::UnknownExtension(path) => write!(f, "{}: unrecognized file extension", path),
        }
    }
}

impl From<lang::CompileError> for Error {
    fn from(e: lang::CompileError) -> Self {
        Error::Compile(e)
    }
}

impl From<asm::AssembleError> for Error {
    fn from(e: asm::AssembleError) -> Self {
        Error::Assemble(e)
    }
}

impl From<octo::InterpretError> for Error {
    fn from(e: octo::InterpretError) -> Self {
        Error::Interpret(e)
    }
}

impl From<harness::HarnessError> for Error {
    fn from(e: harness::HarnessError) -> Self {
        Error::Harness(e)
    }
}

fn read_file(path: &str) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|e| Error::Io(e, path.to_owned()))
}

fn write_file(path: &str, contents: &[u8]) -> Result<(), Error> {
    fs::write(path, contents).map_err(|e| Error::Io(e, path.to_owned()))
}

/// Builds an image from any of the three textual/binary stages,
/// dispatching on the input file's extension (§6).
fn load_image(path: &str) -> Result<Image, Error> {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("lcom") => {
            let source = read_file(path)?;
            let asm_text = lang::compile(&source)?;
            log::info!("compiled {} ({} bytes of ASM)", path, asm_text.len());
            let image = asm::assemble(&asm_text)?;
            log::info!("assembled {}", path);
            Ok(image)
        }
        Some("lasm") => {
            let asm_text = read_file(path)?;
            let image = asm::assemble(&asm_text)?;
            log::info!("assembled {}", path);
            Ok(image)
        }
        Some("lbin") => {
            let bytes = fs::read(path).map_err(|e| Error::Io(e, path.to_owned()))?;
            let mut buf = [0u8; octo::image::SIZE];
            let len = bytes.len().min(octo::image::SIZE);
            buf[..len].copy_from_slice(&bytes[..len]);
            Ok(Image::new(buf))
        }
        _ => Err(Error::UnknownExtension(path.to_owned())),
    }
}

fn cmd_compile(input: &str, output: Option<&str>) -> Result<(), Error> {
    let source = read_file(input)?;
    let asm_text = lang::compile(&source)?;
    match output {
        Some(path) => write_file(path, asm_text.as_bytes())?,
        None => println!("{}", asm_text),
    }
    Ok(())
}

fn cmd_assemble(input: &str, output: &str) -> Result<(), Error> {
    let asm_text = read_file(input)?;
    let image = asm::assemble(&asm_text)?;
    write_file(output, image.as_bytes())?;
    Ok(())
}

fn cmd_run(input: &str, max_cycles: u64) -> Result<(), Error> {
    let mut image = load_image(input)?;
    let mut cycles = 0u64;

    loop {
        if Opcode::from_byte(image.get(image.ip())) == Some(Opcode::End) {
            log::info!("halted after {} cycles", cycles);
            break;
        }
        if cycles >= max_cycles {
            log::warn!("stopped after reaching the {}-cycle limit", max_cycles);
            break;
        }

        let was_output = matches!(Opcode::from_byte(image.get(image.ip())), Some(Opcode::Out) | Some(Opcode::Outc));
        let value = octo::cycle(&mut image)?;
        log::debug!("cycle {}: ip={:#04x}", cycles, image.ip());
        if was_output {
            println!("{}", value);
        }
        cycles += 1;
    }

    Ok(())
}

fn cmd_test(input: &str) -> Result<bool, Error> {
    let text = read_file(input)?;
    let results = harness::run_file(&text)?;

    let mut all_passed = true;
    for (title, result) in &results {
        match result {
            Ok(()) => log::info!("{:<30} - Passed", title),
            Err(e) => {
                log::info!("{:<30} - Failed", title);
                log::info!("  {}", e);
                all_passed = false;
            }
        }
    }

    Ok(all_passed)
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .subcommand(
            SubCommand::with_name("compile")
                .about("Compiles HLL source (.lcom) into ASM text (.lasm)")
                .arg(Arg::with_name("INPUT").required(true).index(1))
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .value_name("OUTPUT"),
                ),
        )
        .subcommand(
            SubCommand::with_name("assemble")
                .about("Assembles ASM text (.lasm) into a 256-byte image (.lbin)")
                .arg(Arg::with_name("INPUT").required(true).index(1))
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .value_name("OUTPUT")
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("Runs a .lcom, .lasm, or .lbin file to completion, printing every output byte")
                .arg(Arg::with_name("INPUT").required(true).index(1))
                .arg(
                    Arg::with_name("max-cycles")
                        .long("max-cycles")
                        .takes_value(true)
                        .default_value("100000"),
                ),
        )
        .subcommand(
            SubCommand::with_name("test")
                .about("Runs every case in a .ltest file")
                .arg(Arg::with_name("INPUT").required(true).index(1)),
        )
        .get_matches();

    let result = match matches.subcommand() {
        ("compile", Some(sub)) => cmd_compile(sub.value_of("INPUT").unwrap(), sub.value_of("output")).map(|_| true),
        ("assemble", Some(sub)) => {
            cmd_assemble(sub.value_of("INPUT").unwrap(), sub.value_of("output").unwrap()).map(|_| true)
        }
        ("run", Some(sub)) => {
            let max_cycles = value_t!(sub.value_of("max-cycles"), u64).unwrap_or(100_000);
            cmd_run(sub.value_of("INPUT").unwrap(), max_cycles).map(|_| true)
        }
        ("test", Some(sub)) => cmd_test(sub.value_of("INPUT").unwrap()),
        _ => {
            eprintln!("{}", matches.usage());
            process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
