use std::path::PathBuf;
use std::process;

use clap::Parser;

use cfgpatch::types::FieldSpec;

/// Insert a field assignment into every `<Struct>::default()` configuration
/// block in a tree of Rust test files, so adding a struct field does not
/// mean editing every test by hand.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// Name of the field to add (e.g. openai_timeout_secs)
    #[clap(long)]
    field: String,

    /// Literal value to assign; the caller supplies quoting (e.g. '"gpt-4"', 120, None)
    #[clap(long)]
    value: String,

    /// Wrap non-None values in Some() for Option<T> fields
    #[clap(long)]
    rust_option: bool,

    /// Configuration struct whose default() constructions are targeted
    #[clap(long = "struct", default_value = "AppSettings")]
    struct_name: String,

    /// Root directory searched recursively for .rs files
    #[clap(long, default_value = "src/tests")]
    test_dir: PathBuf,

    /// Print the changes without modifying any file
    #[clap(long)]
    dry_run: bool,

    /// Verify the field is present in every block instead of updating
    #[clap(long)]
    check: bool,

    /// Emit the outcome as JSON
    #[clap(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.test_dir.exists() {
        eprintln!(
            "error: test directory {} does not exist",
            cli.test_dir.display()
        );
        process::exit(1);
    }

    if cli.check {
        run_check(&cli);
    } else {
        run_update(&cli);
    }
}

fn run_check(cli: &Cli) {
    let outcome = cfgpatch::check(&cli.test_dir, &cli.struct_name, &cli.field);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
        process::exit(if outcome.all_present() { 0 } else { 1 });
    }

    if outcome.files_scanned == 0 {
        println!("cfgpatch: no .rs files found in {}", cli.test_dir.display());
        process::exit(0);
    }

    println!(
        "cfgpatch: checking {} file(s) for `{}`",
        outcome.files_scanned, cli.field
    );

    for site in &outcome.missing {
        println!("{site}");
    }

    if outcome.all_present() {
        println!("cfgpatch: `{}` is present in every block", cli.field);
        process::exit(0);
    }

    println!(
        "cfgpatch: `{}` is missing in {} block(s)",
        cli.field,
        outcome.missing.len()
    );
    process::exit(1);
}

fn run_update(cli: &Cli) {
    let field = FieldSpec::new(&cli.field, &cli.value, cli.rust_option);
    let outcome = cfgpatch::update(&cli.test_dir, &cli.struct_name, &field, cli.dry_run);

    // The formatter runs after any real modification, in every output mode.
    let needs_fmt = !cli.dry_run && outcome.files_modified() > 0;

    if cli.json {
        if needs_fmt {
            run_formatter(cli);
        }
        println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
        process::exit(0);
    }

    if outcome.files_scanned == 0 {
        println!("cfgpatch: no .rs files found in {}", cli.test_dir.display());
        process::exit(0);
    }

    let verb = if cli.dry_run { "would modify" } else { "updated" };
    for change in &outcome.changes {
        println!("{verb}: {change}");
    }

    println!(
        "cfgpatch: {} of {} file(s) {verb} ({} insertion(s))",
        outcome.files_modified(),
        outcome.files_scanned,
        outcome.insertion_count()
    );

    if needs_fmt {
        run_formatter(cli);
    }

    process::exit(0);
}

fn run_formatter(cli: &Cli) {
    match cfgpatch::format::run_cargo_fmt(&cli.test_dir) {
        Ok(output) if output.status.success() => {
            if !cli.json {
                println!("cfgpatch: formatted with cargo fmt");
            }
        }
        Ok(output) => {
            eprintln!("warning: cargo fmt failed");
            eprint!("{}", String::from_utf8_lossy(&output.stderr));
        }
        Err(e) => {
            eprintln!("warning: could not run cargo fmt: {e}");
        }
    }
}
