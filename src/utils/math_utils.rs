lazy_static! {
    pub static ref LOG_ONE_HALF: f64 = 0.5_f64.ln();
    pub static ref LOG_ONE_TENTH: f64 = 0.1_f64.ln();
    pub static ref LOG_NINE_TENTHS: f64 = 0.9_f64.ln();
    pub static ref LOG_THREE: f64 = 3.0_f64.ln();
    pub static ref LOG_LENGTH_FACTOR: f64 = 1.3_f64.ln();
    pub static ref INV_LN_10: f64 = 1.0 / std::f64::consts::LN_10;
    static ref LOG1MEXP_THRESHOLD: f64 = 0.5_f64.ln();
}

pub struct MathUtils {}

impl MathUtils {
    /**
     * Computes log(e^a + e^b) with the larger exponent factored out, so that the
     * intermediate exponentials stay in range for strongly negative log values.
     */
    pub fn log_add_exp(a: f64, b: f64) -> f64 {
        let max_exp = if a > b { a } else { b };
        ((a - max_exp).exp() + (b - max_exp).exp()).ln() + max_exp
    }

    /**
     * Computes log(sum e^a_i) over a slice with the max-factor trick.
     */
    pub fn log_sum_exp(a: &[f64]) -> f64 {
        let mut max_exp = a[0];
        for &value in &a[1..] {
            if value > max_exp {
                max_exp = value;
            }
        }
        let sum: f64 = a.iter().map(|&value| (value - max_exp).exp()).sum();
        sum.ln() + max_exp
    }

    /**
     * Calculates log(1 - exp(a)) for a <= 0 without losing precision, following
     * Maechler's Rmpfr note: log1p for strongly negative a, expm1 near zero.
     */
    pub fn log1mexp(a: f64) -> f64 {
        if a < *LOG1MEXP_THRESHOLD {
            libm::log1p(-a.exp())
        } else {
            (-a.exp_m1()).ln()
        }
    }

    /// C `printf %e` rendering: six-digit mantissa, signed two-digit exponent.
    pub fn format_exp(x: f64) -> String {
        let formatted = format!("{:.6e}", x);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        }
    }
}
