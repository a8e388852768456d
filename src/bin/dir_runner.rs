//! Directory-walking test/fixture binary.
//!
//! Walks a directory of assembly fixtures, runs both cost models over
//! each file, and prints one tab-separated `filename  020-cycles
//! 060-cycles/iter` line per file. Exits nonzero and names the
//! offending file on the first failure, matching the upstream test
//! harness this binary stands in for.

use m68k_cycles::cpu_model::CpuModel;
use m68k_cycles::error::Error;
use m68k_cycles::model020::Model020;
use m68k_cycles::model060::Model060;
use m68k_cycles::parser;
use std::path::{Path, PathBuf};

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(std::fs::DirEntry::path);
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

fn run_one(path: &Path) -> Result<(f64, f64), Error> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::unsupported(format!("could not open {}: {e}", path.display())))?;
    let instructions = parser::parse_program(&text)?;
    let res_020 = Model020::new().simulate(&instructions, 0, false)?;
    let res_060 = Model060::new().simulate(&instructions, 0, false)?;
    Ok((res_020, res_060))
}

fn main() {
    let dir = std::env::args().nth(1).unwrap_or_else(|| "demos".to_string());
    let dir = Path::new(&dir);

    let mut files = Vec::new();
    if let Err(e) = collect_files(dir, &mut files) {
        eprintln!("Error opening {}: {e}", dir.display());
        std::process::exit(1);
    }

    for path in &files {
        match run_one(path) {
            Ok((res_020, res_060)) => {
                let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("?");
                println!("{name}\t{res_020}\t{res_060}");
            }
            Err(e) => {
                eprintln!("Error while processing {}", path.display());
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
