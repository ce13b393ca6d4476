use anyhow::Result;
use carbonintensity::Client;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Point it at another server with CARBONINTENSITY_URL or a `.carbonintensityrc` file,
    // and set RUST_LOG=carbonintensity=debug to see each request.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    for intensity in client.todays_intensity()? {
        println!("{intensity}");
    }

    println!();
    for (fuel, factor) in client.intensity_factors()?.iter() {
        println!("{fuel:>22}: {factor} gCO2/kWh");
    }
    Ok(())
}
