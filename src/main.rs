fn main() -> anyhow::Result<()> {
    alienrouter::cli::run_cli()
}
