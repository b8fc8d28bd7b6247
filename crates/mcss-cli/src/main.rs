use clap::Parser;
use std::path::Path;

#[derive(Parser)]
#[command(name = "mcss")]
#[command(about = "MCSS — minimalist CSS dialect compiler")]
#[command(version)]
struct Cli {
    /// Input .mcss file; output is written next to it with a .css extension
    path: String,
}

fn main() {
    let cli = Cli::parse();
    build(&cli.path);
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if p.extension().and_then(|e| e.to_str()) != Some("mcss") {
        eprintln!("Error: expected a .mcss file, got: {path}");
        std::process::exit(1);
    }
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn build(path: &str) {
    let source = read_source(path);

    // Advisory only: raw braces and !important compile fine, they are just
    // usually mistakes carried over from plain CSS
    for lint in mcss_lexer::lint(&source) {
        eprintln!("warning: {lint}");
    }

    let chunks = match mcss_parser::Parser::parse(&source) {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let css = match mcss_codegen::compile(chunks) {
        Ok(css) => css,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let out_path = Path::new(path).with_extension("css");
    if let Err(e) = std::fs::write(&out_path, &css) {
        eprintln!("Error writing {}: {e}", out_path.display());
        std::process::exit(1);
    }

    eprintln!("Built: {}", out_path.display());
}
