use std::env;
use std::error::Error;
use std::path::Path;

use readywriter::{FileDescriptorConfig, Kind, WriterConfig, default_registry};

const FD_VARIABLE: &str = "READYWRITER_DEMO_FD";
const SELF_FD_DIR: &str = "/proc/self/fd";

fn print_usage_and_exit() -> ! {
    eprintln!("Usage:");
    eprintln!("  readywriter_demo [options] [--] <operand> [...]");
    eprintln!();
    eprintln!("Concatenates the operands into one message and writes it twice:");
    eprintln!("  - through a file descriptor writer; {FD_VARIABLE} selects the");
    eprintln!("    descriptor, and unset or unusable values fall back to stdout");
    eprintln!("  - through a path writer targeting a generated file under the");
    eprintln!("    rw_messages directory in the system temporary directory");
    std::process::exit(0);
}

/// Descriptor requested through the environment, when it is usable.
fn bespoke_fd() -> i32 {
    if !cfg!(target_os = "linux") || !Path::new(SELF_FD_DIR).is_dir() {
        return 1;
    }
    let Some(fd) = env::var(FD_VARIABLE)
        .ok()
        .and_then(|raw| raw.parse::<i32>().ok())
    else {
        return 1;
    };
    if Path::new(SELF_FD_DIR).join(fd.to_string()).exists() {
        fd
    } else {
        1
    }
}

/// Split arguments at the first `--`.
///
/// Without a separator every argument counts as both an option and an
/// operand.
fn split_operands(args: &[String]) -> (&[String], &[String]) {
    match args.iter().position(|arg| arg == "--") {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, args),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (options, operands) = split_operands(&args);

    if operands.is_empty() || options.iter().any(|arg| arg == "-h" || arg == "--help") {
        print_usage_and_exit();
    }

    let message = operands.concat();
    let registry = default_registry();

    let fd = bespoke_fd();
    let fd_writer = if fd != 1 {
        registry.ready_writer(Some(&WriterConfig::from(FileDescriptorConfig::new(fd))))
    } else {
        registry.ready_writer_by_kind(Kind::FileDescriptor)
    }
    .ok_or("no file descriptor provider registered")?;
    let path_writer = registry
        .ready_writer_by_kind(Kind::Path)
        .ok_or("no path provider registered")?;

    fd_writer.write(&message)?;
    path_writer.write(&message)?;

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("readywriter_demo error: {e}");
        std::process::exit(1);
    }
}
