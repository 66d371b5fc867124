use clap::Parser;
use shelfie::ServerArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelfie::run(ServerArgs::parse()).await
}
