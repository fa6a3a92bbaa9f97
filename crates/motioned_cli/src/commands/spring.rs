use anyhow::Result;
use motioned_animation::{
    sample_generator, Generator, Sample, SpringConfig, SpringGenerator, SpringParams,
};

pub struct SpringArgs {
    pub from: f64,
    pub to: f64,
    pub stiffness: f64,
    pub friction: f64,
    pub mass: f64,
    pub velocity: f64,
    pub resolution: u32,
}

fn sample(args: &SpringArgs) -> (SpringGenerator, Sample) {
    let params = SpringParams::new(args.from, args.to)
        .with_config(SpringConfig::new(args.stiffness, args.friction, args.mass))
        .with_velocity(args.velocity);
    let generator = SpringGenerator::new(params);
    let sample = sample_generator(&generator, args.from, args.to, args.resolution);
    (generator, sample)
}

pub fn run(args: SpringArgs, table: bool) -> Result<()> {
    let (generator, sample) = sample(&args);

    println!("damping ratio: {:.3}", generator.damping_ratio());
    println!("duration: {}ms", sample.duration);
    println!("samples: {}", sample.positions.len());

    if table {
        let step = 1000.0 / args.resolution.max(1) as f64;
        println!("{:>10} {:>14} {:>14} {:>10}", "t (ms)", "position", "velocity", "progress");
        // The final stop is the appended target, not a generator sample
        let sampled = sample.positions.len().saturating_sub(1);
        for (i, progress) in sample.easing_positions.iter().take(sampled).enumerate() {
            let t = i as f64 * step;
            let state = generator.state_at(t);
            println!(
                "{:>10.2} {:>14.6} {:>14.6} {:>10.6}",
                t, state.position, state.velocity, progress
            );
        }
    } else {
        println!("easing: {}", sample.easing().to_css(sample.duration));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_respects_args() {
        let args = SpringArgs {
            from: 0.0,
            to: 100.0,
            stiffness: 100.0,
            friction: 10.0,
            mass: 1.0,
            velocity: 0.0,
            resolution: 60,
        };
        let (generator, sample) = sample(&args);
        assert!((generator.damping_ratio() - 0.5).abs() < 1e-12);
        assert_eq!(*sample.positions.last().unwrap(), 100.0);
        assert!(sample.duration > 0.0);
    }
}
