// Modified Bessel functions of the second kind, needed for the mean energy
// of a relativistic thermal (Maxwell-Juttner) distribution.
//
// Polynomial approximations from Abramowitz & Stegun, sections 9.8.1-9.8.8.
// Absolute error is below 1e-7 over the domain the sampler uses
// (x = m/T of order 1-10).

/// K0(x) for x > 0.
pub fn bessel_k0(x: f64) -> f64 {
    if x <= 2.0 {
        let u = x * x / 4.0;
        let poly = -0.57721566
            + u * (0.42278420
                + u * (0.23069756
                    + u * (0.03488590 + u * (0.00262698 + u * (0.00010750 + u * 0.00000740)))));
        -(x / 2.0).ln() * bessel_i0(x) + poly
    } else {
        let v = 2.0 / x;
        let poly = 1.25331414
            + v * (-0.07832358
                + v * (0.02189568
                    + v * (-0.01062446
                        + v * (0.00587872 + v * (-0.00251540 + v * 0.00053208)))));
        (-x).exp() / x.sqrt() * poly
    }
}

/// K1(x) for x > 0.
pub fn bessel_k1(x: f64) -> f64 {
    if x <= 2.0 {
        let u = x * x / 4.0;
        let poly = 1.0
            + u * (0.15443144
                + u * (-0.67278579
                    + u * (-0.18156897
                        + u * (-0.01919402 + u * (-0.00110404 + u * (-0.00004686))))));
        (x / 2.0).ln() * bessel_i1(x) + poly / x
    } else {
        let v = 2.0 / x;
        let poly = 1.25331414
            + v * (0.23498619
                + v * (-0.03655620
                    + v * (0.01504268 + v * (-0.00780353 + v * (0.00325614 + v * (-0.00068245))))));
        (-x).exp() / x.sqrt() * poly
    }
}

/// K2(x) via the upward recurrence K_{n+1} = K_{n-1} + (2n/x) K_n.
pub fn bessel_k2(x: f64) -> f64 {
    bessel_k0(x) + 2.0 / x * bessel_k1(x)
}

fn bessel_i0(x: f64) -> f64 {
    let t = x / 3.75;
    let t2 = t * t;
    1.0 + t2
        * (3.5156229
            + t2 * (3.0899424
                + t2 * (1.2067492 + t2 * (0.2659732 + t2 * (0.0360768 + t2 * 0.0045813)))))
}

fn bessel_i1(x: f64) -> f64 {
    let t = x / 3.75;
    let t2 = t * t;
    x * (0.5
        + t2 * (0.87890594
            + t2 * (0.51498869
                + t2 * (0.15084934 + t2 * (0.02658733 + t2 * (0.00301532 + t2 * 0.00032411))))))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference values from tabulated K_n.
    #[test]
    fn test_k0_known_values() {
        assert!((bessel_k0(1.0) - 0.421024438).abs() < 1e-6);
        assert!((bessel_k0(2.0) - 0.113893873).abs() < 1e-6);
        assert!((bessel_k0(5.0) - 0.003691098).abs() < 1e-7);
    }

    #[test]
    fn test_k1_known_values() {
        assert!((bessel_k1(1.0) - 0.601907230).abs() < 1e-6);
        assert!((bessel_k1(2.0) - 0.139865882).abs() < 1e-6);
        assert!((bessel_k1(5.0) - 0.004044613).abs() < 1e-7);
    }

    #[test]
    fn test_k2_recurrence_value() {
        assert!((bessel_k2(1.0) - 1.624838899).abs() < 1e-5);
        assert!((bessel_k2(2.0) - 0.253759755).abs() < 1e-6);
    }

    #[test]
    fn test_continuity_at_switch() {
        // The two approximation branches meet at x = 2.
        let below = bessel_k1(2.0 - 1e-9);
        let above = bessel_k1(2.0 + 1e-9);
        assert!((below - above).abs() < 1e-6);
    }
}
