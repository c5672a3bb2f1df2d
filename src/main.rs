//! aait CLI entry point

use std::process::ExitCode;

use clap::Parser;

use assemblyai_tool::cli::{
    app::{run_batch, run_convert, run_delete, run_list, run_load, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_tracing,
    presenter::Presenter,
    BatchArgs, ServiceSettings,
};
use assemblyai_tool::infrastructure::XdgConfigStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = ServiceSettings {
        base_url: cli.api_url,
    };

    match cli.command {
        Commands::Convert {
            input,
            output,
            options,
        } => run_convert(&settings, input, output, options).await,
        Commands::Batch {
            input_dir,
            output_dir,
            upload_concurrency,
            processing_concurrency,
            options,
        } => {
            let batch = BatchArgs {
                upload_concurrency: upload_concurrency.map(|n| n as usize),
                processing_concurrency: processing_concurrency.map(|n| n as usize),
            };
            run_batch(&settings, input_dir, output_dir, batch, options).await
        }
        Commands::List { limit } => run_list(&settings, limit).await,
        Commands::Load {
            transcript,
            format,
            output,
            no_speaker_labels,
        } => run_load(&settings, transcript, format, output, no_speaker_labels).await,
        Commands::Delete { transcript, force } => run_delete(&settings, transcript, force).await,
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            let presenter = Presenter::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
