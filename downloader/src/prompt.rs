use std::io::{self, BufRead, Write};
use tabcore::{parse_selection, ResultCollection};

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<Option<String>> {
    write!(out, "\n> {question}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 { return Ok(None); }
    Ok(Some(line.trim().to_string()))
}

/// Ask for search terms until at least one is given. `None` on end of input.
pub fn read_search_terms<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<Vec<String>>> {
    loop {
        let Some(line) = ask(input, out, "Search for: ")? else { return Ok(None) };
        let terms: Vec<String> = line.split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect();
        if !terms.is_empty() { return Ok(Some(terms)); }
    }
}

pub fn display_results<W: Write>(out: &mut W, results: &ResultCollection) -> io::Result<()> {
    writeln!(out)?;
    for (i, record) in results.iter().enumerate() {
        writeln!(out, "[{}] {}", i + 1, record)?;
    }
    Ok(())
}

/// Ask which results to download, re-asking on a bad selection.
/// An empty line or end of input selects nothing.
pub fn read_selection<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    results: &ResultCollection,
) -> io::Result<Option<Vec<String>>> {
    loop {
        let Some(line) = ask(input, out, "Pick a tab by entering a number, range or \"all\": ")? else { return Ok(None) };
        if line.is_empty() { return Ok(None); }
        match parse_selection(&line, results) {
            Ok(urls) => return Ok(Some(urls)),
            Err(e) if e.is_selection() => writeln!(out, "{e}")?,
            Err(e) => return Err(io::Error::other(e)),
        }
    }
}
