/// Asserts that a particle with the given id is present and has at least the
/// given energy.
#[macro_export]
macro_rules! assert_energy_above {
    ($sim:expr, $id:expr, $min_energy:expr) => {
        let particle = $sim.particle($id).expect("Particle not found in simulation");
        let energy = particle.behavior.as_ref().map_or(0.0, |b| b.energy);
        assert!(
            energy > $min_energy,
            "Particle {} energy {} is not above {}",
            $id,
            energy,
            $min_energy
        );
    };
}

/// Asserts that a particle with the given id is no longer in the simulation.
#[macro_export]
macro_rules! assert_particle_gone {
    ($sim:expr, $id:expr) => {
        assert!(
            $sim.particle($id).is_none(),
            "Particle {} should be gone but was found",
            $id
        );
    };
}

/// Asserts that the population matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($sim:expr, $count:expr) => {
        assert_eq!($sim.population(), $count, "Population count mismatch");
    };
}

/// Asserts two floats agree within `eps`.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $eps:expr) => {
        let (left, right) = ($left as f64, $right as f64);
        assert!(
            (left - right).abs() <= $eps,
            "{} and {} differ by more than {}",
            left,
            right,
            $eps
        );
    };
}
