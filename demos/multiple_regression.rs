use linreg_gd::{
    backend::Backend,
    data::{GeneratorConfig, generate},
    logger::Verbosity,
    report::Comparison,
    trainer::{TrainConfig, train},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;

// usage: multiple_regression [seed] [cpu|rayon]
fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let mut rng = match args.next() {
        Some(seed) => StdRng::seed_from_u64(seed.parse()?),
        None => StdRng::from_os_rng(),
    };
    let backend: Backend = match args.next() {
        Some(name) => name.parse()?,
        None => Backend::default(),
    };

    // intercept plus three features
    let num_features = 3;
    let actual: Vec<f64> = (0..=num_features)
        .map(|_| f64::from(rng.random_range(1..=10_i32)))
        .collect();
    let num_observations = actual.len() + 2;

    let observations = generate(&actual, num_observations, &GeneratorConfig::default(), &mut rng)?;
    for (x, y) in observations.iter() {
        println!("x = {:>8.4?}  y = {:>8.4}", &x[1..], y);
    }

    let config = TrainConfig {
        backend,
        verbosity: Verbosity::Debug,
        ..TrainConfig::multiple()
    };
    let report = train(&observations, &config, &mut rng)?;

    println!("{}", Comparison::new(&actual, &report.initial, &report.coefficients));

    Ok(())
}
