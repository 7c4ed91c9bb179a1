use std::env;
use std::fs;
use std::process::ExitCode;

use i8080::Cpu;

const DEFAULT_ORIGIN: u16 = 0x0100;

fn parse_origin(arg: &str) -> Option<u16> {
    let digits = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X"))?;
    u16::from_str_radix(digits, 16).ok()
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(image_path) = args.next() else {
        eprintln!("usage: i8080 <image> [--origin 0xNNNN]");
        return ExitCode::FAILURE;
    };

    let mut origin = DEFAULT_ORIGIN;
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--origin" => {
                let Some(value) = args.next().and_then(|v| parse_origin(&v)) else {
                    eprintln!("--origin expects a hex address like 0x0100");
                    return ExitCode::FAILURE;
                };
                origin = value;
            }
            other => {
                eprintln!("unrecognized argument: {other}");
                return ExitCode::FAILURE;
            }
        }
    }

    let image = match fs::read(&image_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("failed to read {image_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut cpu = Cpu::new();
    if let Err(err) = cpu.load_at(origin, &image) {
        eprintln!("failed to load {image_path} at {origin:#06x}: {err}");
        return ExitCode::FAILURE;
    }
    cpu.reset(origin);
    cpu.run();

    let output = cpu.bdos_output();
    if !output.is_empty() {
        print!("{}", String::from_utf8_lossy(output));
    }

    println!(
        "halted at pc={:#06x} a={:02x} bc={:04x} de={:04x} hl={:04x} sp={:04x} flags={:02x}",
        cpu.regs.pc,
        cpu.regs.a,
        cpu.regs.bc(),
        cpu.regs.de(),
        cpu.regs.hl(),
        cpu.regs.sp,
        cpu.regs.flags_byte(),
    );

    ExitCode::SUCCESS
}
