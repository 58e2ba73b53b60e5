//! RP2A03 - a 6502 program runner built on the NES CPU core

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Select};
use log::{error, info, warn};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

use rp2a03::rom_loader::{check_fits, list_images, load_image};
use rp2a03::{Cpu, FlatRam};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program image to load (.bin or .prg)
    program: Option<PathBuf>,

    /// Directory containing program images (default: ./programs)
    #[arg(short = 'd', long, default_value = "programs")]
    program_dir: PathBuf,

    /// List available program images and exit
    #[arg(short, long)]
    list: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Log a disassembly line for every executed instruction
    #[arg(short, long)]
    trace: bool,

    /// Address (hex) the image is loaded at
    #[arg(long, default_value = "8000", value_parser = parse_hex)]
    load_addr: u16,

    /// Entry point (hex); defaults to the load address
    #[arg(long, value_parser = parse_hex)]
    entry: Option<u16>,

    /// Stop after this many instructions
    #[arg(long, default_value_t = 1_000_000)]
    max_steps: u64,
}

fn parse_hex(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches('$');
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address {s:?}: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.trace {
        LevelFilter::Trace
    } else if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    info!("Starting RP2A03 runner");

    if args.list {
        list_and_exit(&args.program_dir)?;
    }

    if let Some(program) = &args.program {
        load_and_run(&args, program)
    } else {
        interactive_menu(&args)
    }
}

/// List available program images and exit
fn list_and_exit(program_dir: &Path) -> Result<()> {
    println!("Available programs in {}:", program_dir.display());

    match list_images(program_dir) {
        Ok(images) => {
            if images.is_empty() {
                println!("  No programs found");
            } else {
                for image in images {
                    println!("  {}", image);
                }
            }
        }
        Err(e) => {
            eprintln!("Error reading program directory: {}", e);
        }
    }

    std::process::exit(0);
}

/// Show interactive menu to select and run a program image
fn interactive_menu(args: &Args) -> Result<()> {
    let images = match list_images(&args.program_dir) {
        Ok(images) => images,
        Err(e) => {
            eprintln!("Error reading program directory: {}", e);
            return Ok(());
        }
    };

    if images.is_empty() {
        println!("No programs found in {}", args.program_dir.display());
        println!("Please place .bin or .prg images in the programs/ directory.");
        return Ok(());
    }

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a program to run")
        .default(0)
        .items(&images)
        .interact()?;

    let program = args.program_dir.join(&images[selection]);
    load_and_run(args, &program)
}

/// Load a program image and drive the CPU until it stops
fn load_and_run(args: &Args, program: &Path) -> Result<()> {
    let image = load_image(program)
        .with_context(|| format!("Failed to load {}", program.display()))?;
    check_fits(&image, args.load_addr)?;

    let entry = args.entry.unwrap_or(args.load_addr);
    info!(
        "Loaded {} bytes at {:04X}, entry {:04X}",
        image.len(),
        args.load_addr,
        entry
    );

    let mut ram = FlatRam::new();
    ram.load(args.load_addr, &image);
    ram.set_reset_vector(entry);

    let mut cpu = Cpu::new();
    cpu.reset(&mut ram);

    let mut steps: u64 = 0;
    loop {
        if steps >= args.max_steps {
            warn!("Step limit of {} reached", args.max_steps);
            break;
        }

        let pc_before = cpu.reg.pc;
        cpu.step(&mut ram);
        steps += 1;

        if cpu.is_jammed() {
            error!("CPU jammed at {:04X}", pc_before);
            break;
        }
        if cpu.reg.pc == pc_before {
            // A branch or jump to itself is the idiomatic "done" signal in
            // standalone 6502 programs.
            info!("Program reached a self loop at {:04X}", pc_before);
            break;
        }
    }

    info!(
        "Executed {} instructions in {} cycles; A={:02X} X={:02X} Y={:02X} P={:02X} SP={:02X} PC={:04X}",
        steps,
        cpu.cycles,
        cpu.reg.a,
        cpu.reg.x,
        cpu.reg.y,
        cpu.reg.p.bits(),
        cpu.reg.s,
        cpu.reg.pc
    );

    Ok(())
}
