#[tokio::main]
async fn main() {
    if let Err(err) = sheetfeed::run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
