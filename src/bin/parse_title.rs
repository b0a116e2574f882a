//! Debug binary: show how headlines are parsed.
//!
//! Usage:
//!   parse_title "Black Dog - Led Zeppelin [Classic Rock] (1975)" ...
//!   some_command | parse_title          (one title per line on stdin)

use std::io::{self, BufRead};

use playlistbot::{parse_title, TitleParse};

fn show(raw: &str) {
    println!("{}", raw);
    match parse_title(raw) {
        Ok(TitleParse::Candidate(c)) => {
            println!("  Title:  {}", c.title);
            println!("  Artist: {}", c.artist);
            println!("  Genre:  {}", c.genre.as_deref().unwrap_or("-"));
            println!("  Year:   {}", c.year.as_deref().unwrap_or("-"));
        }
        Ok(TitleParse::Skip(reason)) => println!("  Skipped: {}", reason),
        Err(e) => println!("  Error: {}", e),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if !args.is_empty() {
        for raw in &args {
            show(raw);
        }
        return;
    }

    for line in io::stdin().lock().lines() {
        match line {
            Ok(raw) if !raw.trim().is_empty() => show(&raw),
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading stdin: {}", e);
                break;
            }
        }
    }
}
