mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use node_core::policy::NodeAddress;
use session::Session;

fn main() -> io::Result<()> {
    let address = parse_address().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("Usage: node-emulator [--address <1-15>]");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = Session::new(address);
    let mut line = String::new();

    writeln!(
        writer,
        "RGB node emulator at address {}. Type `help` for commands or `exit` to quit.",
        address.get()
    )?;
    for startup in session.startup_lines() {
        writeln!(writer, "{startup}")?;
    }

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for response in session.handle_command(trimmed) {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_address() -> Result<NodeAddress, String> {
    let mut args = env::args().skip(1);
    let raw = if let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--address=") {
            value.to_string()
        } else if arg == "--address" {
            args.next()
                .ok_or_else(|| "Expected value after --address".to_string())?
        } else {
            arg
        }
    } else {
        return NodeAddress::new(1).ok_or_else(|| "default address invalid".to_string());
    };

    raw.parse::<u8>()
        .ok()
        .and_then(NodeAddress::new)
        .ok_or_else(|| format!("`{raw}` is not a node address (1-15)"))
}
