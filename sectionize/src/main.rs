use clap::Parser;
use sectionize_lib::parse_css_and_match_sections;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "sectionize")]
#[command(about = "Split pasted HTML + CSS into reusable page sections")]
struct Args {
    /// HTML input file.
    html: PathBuf,

    /// CSS input file.
    css: PathBuf,

    /// Directory to write per-section .html/.css files into.
    #[arg(short, long, default_value = "sections")]
    out: PathBuf,

    /// Print the sections as JSON on stdout instead of writing files.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let html = read_input(&args.html);
    let css = read_input(&args.css);

    let sections = parse_css_and_match_sections(&html, &css);
    if sections.is_empty() {
        eprintln!("No sections found. Input needs <section> elements or <div> elements with an id.");
        process::exit(1);
    }
    log::info!("matched {} sections", sections.len());

    if args.json {
        match serde_json::to_string_pretty(&sections) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error encoding sections as JSON: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = fs::create_dir_all(&args.out) {
        eprintln!("Error creating output directory {}: {}", args.out.display(), e);
        process::exit(1);
    }
    for section in &sections {
        let html_path = args.out.join(format!("{}.html", section.id));
        let css_path = args.out.join(format!("{}.css", section.id));
        if let Err(e) =
            fs::write(&html_path, &section.html).and_then(|_| fs::write(&css_path, &section.css))
        {
            eprintln!("Error writing section {}: {}", section.id, e);
            process::exit(1);
        }
    }
    println!("Wrote {} sections to {}", sections.len(), args.out.display());
}

fn read_input(path: &PathBuf) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}
