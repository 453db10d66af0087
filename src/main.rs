use clap::Parser;
use sealtext::cli::{init_logging, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encrypt {
            ref text,
            ref salt,
            iterations,
            progress,
            json,
        } => sealtext::cli::commands::encrypt::execute(
            &cli,
            text.as_deref(),
            salt.as_deref(),
            iterations,
            progress,
            json,
        ),
        Commands::Decrypt {
            ref text,
            progress,
            json,
        } => sealtext::cli::commands::decrypt::execute(&cli, text.as_deref(), progress, json),
        Commands::Salt { len } => sealtext::cli::commands::salt::execute(&cli, len),
        Commands::Genpass {
            length,
            no_upper,
            no_digits,
            symbols,
        } => sealtext::cli::commands::genpass::execute(length, no_upper, no_digits, symbols),
        Commands::Completions { shell } => sealtext::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        sealtext::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
