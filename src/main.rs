use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = omada_cli::cli::Cli::parse();
    let exit_code = omada_cli::run(cli).await;
    std::process::exit(exit_code);
}
