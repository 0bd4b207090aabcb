use linreg_gd::{
    data::{GeneratorConfig, generate_simple},
    logger::Verbosity,
    report::Comparison,
    trainer::{TrainConfig, train},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;

// usage: simple_regression [seed]
fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = match std::env::args().nth(1) {
        Some(seed) => StdRng::seed_from_u64(seed.parse()?),
        None => StdRng::from_os_rng(),
    };

    // pick a ground truth y = b0 + b1 * x
    let intercept = f64::from(rng.random_range(1..=10_i32));
    let slope = f64::from(rng.random_range(1..=10_i32));
    let actual = [intercept, slope];
    let num_observations = 5;

    let observations = generate_simple(
        intercept,
        slope,
        num_observations,
        &GeneratorConfig::default(),
        &mut rng,
    )?;
    for (x, y) in observations.iter() {
        println!("x = {:>8.4}  y = {:>8.4}", x[1], y);
    }

    let config = TrainConfig {
        verbosity: Verbosity::Debug,
        ..TrainConfig::simple()
    };
    let report = train(&observations, &config, &mut rng)?;

    println!("{}", Comparison::new(&actual, &report.initial, &report.coefficients));

    Ok(())
}
