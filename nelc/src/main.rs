use clap::Parser;
use color_print::cprintln;
use nelc::ast::Program;
use nelc::{Config, Error};
use std::fs::File;
use std::io::BufReader;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Parsed program (YAML syntax tree)
    #[clap(default_value = "main.yaml")]
    input: String,

    /// Output rom
    #[clap(short, long, default_value = "main.nes")]
    output: String,

    /// Config file (YAML)
    #[clap(short, long)]
    config: Option<String>,

    /// Errors allowed before giving up
    #[clap(long)]
    max_errors: Option<usize>,

    /// Enable verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn load(path: &str) -> Result<Program, Error> {
    let file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    serde_yaml::from_reader(BufReader::new(file)).map_err(|e| Error::Yaml(path.to_string(), e))
}

fn fail(error: Error) -> ! {
    cprintln!("<red,bold>error</>: {}", error);
    std::process::exit(1);
}

fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| fail(e)),
        None => Config::default(),
    };
    if let Some(limit) = args.max_errors {
        config.error_limit = limit;
    }
    config.verbose |= args.verbose;

    // 1. Load syntax tree
    println!("1. Load {}", args.input);
    let program = load(&args.input).unwrap_or_else(|e| fail(e));

    // 2. Compile
    println!("2. Compile");
    let rom = match nelc::compile(program, config) {
        Ok(rom) => rom,
        Err(failure) => {
            eprintln!("* nelc: failed with {} error(s).", failure.errors);
            std::process::exit(1);
        }
    };

    // 3. Write rom
    println!("3. Write {} ({} bytes)", args.output, rom.len());
    std::fs::write(&args.output, rom).unwrap_or_else(|e| fail(Error::FileWrite(args.output.clone(), e)));

    println!("Successfully compiled {} to {}", args.input, args.output);
}
