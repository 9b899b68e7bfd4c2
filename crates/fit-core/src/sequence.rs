//! Candidate generation: real recurrences and the complex arcsine ascent.

use fit_model::{
    AscentOptions, Candidate, CandidateKind, CandidateSet, GeneratingRule, SearchOptions,
};
use num_complex::Complex64;
use tracing::{debug, warn};

use crate::error::SequenceError;

/// One application of the generating rule.
pub fn step(rule: GeneratingRule, x: f64) -> f64 {
    match rule {
        GeneratingRule::Sine => x.sin(),
        GeneratingRule::SineExp => x.sin() + (-x).exp(),
    }
}

/// `count` values of the sequence starting at `seed`, seed included.
pub fn generate_values(seed: f64, rule: GeneratingRule, count: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(count);
    let mut current = seed;
    for _ in 0..count {
        values.push(current);
        current = step(rule, current);
    }
    values
}

/// Generated levels as [`CandidateKind::Seed`] candidates named `{prefix}{n}`.
pub fn generate_levels(
    seed: f64,
    rule: GeneratingRule,
    count: usize,
    prefix: &str,
) -> Result<CandidateSet, SequenceError> {
    if !seed.is_finite() {
        return Err(SequenceError::NonFiniteSeed(seed));
    }
    let mut set = CandidateSet::new();
    for (n, value) in generate_values(seed, rule, count).into_iter().enumerate() {
        set.push(Candidate::new(
            format!("{prefix}{n}"),
            value,
            CandidateKind::Seed,
        ))?;
    }
    Ok(set)
}

/// Complex levels `asinⁱ(asin(seed))` for `i = 1..=depth`.
///
/// Stops early at the first non-finite level.
pub fn ascent_levels(seed: f64, depth: usize) -> Result<Vec<Complex64>, SequenceError> {
    if !seed.is_finite() {
        return Err(SequenceError::NonFiniteSeed(seed));
    }
    if seed.abs() > 1.0 {
        return Err(SequenceError::SeedOutOfDomain { seed });
    }
    let mut levels = Vec::with_capacity(depth);
    let mut current = Complex64::new(seed.asin(), 0.0);
    for i in 1..=depth {
        current = current.asin();
        if !current.re.is_finite() || !current.im.is_finite() {
            warn!(step = i, "ascent produced a non-finite level, stopping");
            break;
        }
        levels.push(current);
    }
    Ok(levels)
}

/// Splits one complex level into its derived candidates.
///
/// Real and imaginary parts are taken as absolute values. Inverses are
/// skipped for zero parts.
pub fn decompose(name: &str, level: Complex64, options: &AscentOptions) -> Vec<Candidate> {
    let re = level.re.abs();
    let im = level.im.abs();
    let mag = re.hypot(im);

    let mut parts: Vec<(CandidateKind, f64)> = vec![
        (CandidateKind::RealPart, re),
        (CandidateKind::ImaginaryPart, im),
        (CandidateKind::Sum, re + im),
        (CandidateKind::Magnitude, mag),
    ];
    if options.include_product {
        parts.push((CandidateKind::Product, re * im));
    }
    if options.include_inverses {
        if re != 0.0 {
            parts.push((CandidateKind::InverseReal, 1.0 / re));
        }
        if im != 0.0 {
            parts.push((CandidateKind::InverseImaginary, 1.0 / im));
        }
    }
    for &power in &options.powers {
        let exponent = i32::from(power);
        parts.push((CandidateKind::RealPower(power), re.powi(exponent)));
        parts.push((CandidateKind::ImaginaryPower(power), im.powi(exponent)));
        if options.magnitude_powers {
            parts.push((CandidateKind::MagnitudePower(power), mag.powi(exponent)));
        }
    }

    let mut candidates = Vec::with_capacity(parts.len() + 1);
    if options.include_complex {
        candidates.push(Candidate::new(name, level, CandidateKind::Complex));
    }
    candidates.extend(parts.into_iter().filter_map(|(kind, value)| {
        kind.suffix()
            .map(|suffix| Candidate::new(format!("{name}_{suffix}"), value, kind))
    }));
    candidates
}

/// The ascent from `seed`, decomposed into candidates named `{prefix}-{i}…`.
pub fn ascend(
    seed: f64,
    prefix: &str,
    options: &AscentOptions,
) -> Result<CandidateSet, SequenceError> {
    let mut set = CandidateSet::new();
    for (i, level) in ascent_levels(seed, options.depth)?.into_iter().enumerate() {
        let name = format!("{prefix}-{}", i + 1);
        for candidate in decompose(&name, level, options) {
            set.push(candidate)?;
        }
    }
    Ok(set)
}

/// Real levels followed by the decomposed ascent, as configured.
pub fn build_candidates(options: &SearchOptions) -> Result<CandidateSet, SequenceError> {
    let mut set = generate_levels(
        options.seed,
        options.rule,
        options.level_count,
        &options.level_prefix,
    )?;
    if options.ascent.depth > 0 {
        set.extend_from(ascend(options.seed, &options.level_prefix, &options.ascent)?)?;
    }
    debug!(candidates = set.len(), "built candidate table");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use fit_model::Scalar;
    use fit_model::constants::CURVATURE;

    use super::*;

    #[test]
    fn sine_levels_decrease_from_seed() {
        let set = generate_levels(CURVATURE, GeneratingRule::Sine, 46, "L").unwrap();
        assert_eq!(set.len(), 46);
        assert_eq!(set.get("L0").map(|c| c.value), Some(Scalar::Real(CURVATURE)));
        let values: Vec<f64> = set.iter().map(|c| c.value.scalar_operand()).collect();
        assert!(values.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(
            set.get("L1").map(|c| c.value),
            Some(Scalar::Real(CURVATURE.sin()))
        );
    }

    #[test]
    fn sine_exp_rule() {
        let values = generate_values(1.0, GeneratingRule::SineExp, 2);
        assert_eq!(values, vec![1.0, 1.0_f64.sin() + (-1.0_f64).exp()]);
    }

    #[test]
    fn first_ascent_level_sits_on_the_real_branch_cut() {
        let levels = ascent_levels(CURVATURE, 3).unwrap();
        assert_eq!(levels.len(), 3);
        let first = levels[0];
        assert!((first.re.abs() - FRAC_PI_2).abs() < 1e-9);
        let a0 = CURVATURE.asin();
        let expected_im = (a0 + (a0 * a0 - 1.0).sqrt()).ln();
        assert!((first.im.abs() - expected_im).abs() < 1e-9);
    }

    #[test]
    fn seed_outside_unit_interval_is_rejected() {
        assert!(matches!(
            ascent_levels(1.5, 4),
            Err(SequenceError::SeedOutOfDomain { .. })
        ));
        assert!(ascent_levels(1.0, 2).is_ok());
    }

    #[test]
    fn decomposition_names_and_kinds() {
        let options = AscentOptions {
            include_complex: true,
            powers: vec![2],
            ..AscentOptions::default()
        };
        let candidates = decompose("L-1", Complex64::new(-3.0, 4.0), &options);
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "L-1",
                "L-1_real",
                "L-1_imag",
                "L-1_sum",
                "L-1_mag",
                "L-1_prod",
                "L-1_inv_real",
                "L-1_inv_imag",
                "L-1_real_p2",
                "L-1_imag_p2",
            ]
        );
        assert_eq!(candidates[1].value, Scalar::Real(3.0));
        assert_eq!(candidates[4].value, Scalar::Real(5.0));
        assert_eq!(candidates[5].value, Scalar::Real(12.0));
        assert_eq!(candidates[9].kind, CandidateKind::ImaginaryPower(2));
    }

    #[test]
    fn zero_parts_have_no_inverse() {
        let candidates = decompose("z", Complex64::new(0.5, 0.0), &AscentOptions::default());
        assert!(candidates.iter().all(|c| c.kind != CandidateKind::InverseImaginary));
        assert!(candidates.iter().any(|c| c.kind == CandidateKind::InverseReal));
    }

    #[test]
    fn default_options_build_levels_and_ascent() {
        let options = SearchOptions::default();
        let set = build_candidates(&options).unwrap();
        // 4 parts + product + 2 inverses + 2 × 3 powers per ascent level
        assert_eq!(set.len(), 46 + 14 * 13);
        assert!(set.get("L-14_mag").is_some());
    }
}
