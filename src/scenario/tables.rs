//! Population statistics observed for the three built-in venues.
//!
//! Joint outcome tuples follow the `*_ORDER` arrays, which are not always the
//! order the venue lists its constraints in.

const T: bool = true;
const F: bool = false;

pub(crate) const SCENARIO_1_ORDER: [&str; 2] = ["young", "well_dressed"];

pub(crate) const SCENARIO_1_FREQUENCIES: [(&str, f64); 2] =
    [("young", 0.3149), ("well_dressed", 0.3223)];

pub(crate) const SCENARIO_1_CORRELATIONS: [(&str, &str, f64); 1] =
    [("young", "well_dressed", 0.1756)];

pub(crate) const SCENARIO_2_ORDER: [&str; 4] =
    ["berlin_local", "creative", "techno_lover", "well_connected"];

pub(crate) const SCENARIO_2_FREQUENCIES: [(&str, f64); 4] = [
    ("techno_lover", 0.6265),
    ("well_connected", 0.47),
    ("creative", 0.06227),
    ("berlin_local", 0.398),
];

pub(crate) const SCENARIO_2_CORRELATIONS: [(&str, &str, f64); 6] = [
    ("techno_lover", "well_connected", -0.4696169332674324),
    ("techno_lover", "creative", 0.09463317039891586),
    ("techno_lover", "berlin_local", -0.6549403815606182),
    ("well_connected", "creative", 0.14197259140471485),
    ("well_connected", "berlin_local", 0.5724067808436452),
    ("creative", "berlin_local", 0.14446459505650772),
];

pub(crate) const SCENARIO_3_ORDER: [&str; 6] = [
    "fashion_forward",
    "german_speaker",
    "international",
    "queer_friendly",
    "underground_veteran",
    "vinyl_collector",
];

pub(crate) const SCENARIO_3_FREQUENCIES: [(&str, f64); 6] = [
    ("underground_veteran", 0.6795),
    ("international", 0.5735),
    ("fashion_forward", 0.691),
    ("queer_friendly", 0.04614),
    ("vinyl_collector", 0.04454),
    ("german_speaker", 0.4565),
];

pub(crate) const SCENARIO_3_CORRELATIONS: [(&str, &str, f64); 15] = [
    ("underground_veteran", "international", -0.08110175777152992),
    ("underground_veteran", "fashion_forward", -0.1696563475505309),
    ("underground_veteran", "queer_friendly", 0.03719928376753885),
    ("underground_veteran", "vinyl_collector", 0.07223521156389842),
    ("underground_veteran", "german_speaker", 0.11188766703422799),
    ("international", "fashion_forward", 0.375711059360155),
    ("international", "queer_friendly", 0.0036693314388711686),
    ("international", "vinyl_collector", -0.03083247098181075),
    ("international", "german_speaker", -0.7172529382519395),
    ("fashion_forward", "queer_friendly", -0.0034530926793377476),
    ("fashion_forward", "vinyl_collector", -0.11024719606358546),
    ("fashion_forward", "german_speaker", -0.3521024461597403),
    ("queer_friendly", "vinyl_collector", 0.47990640803167306),
    ("queer_friendly", "german_speaker", 0.04797381132680503),
    ("vinyl_collector", "german_speaker", 0.09984452286269897),
];

pub(crate) const SCENARIO_1_JOINT: [([bool; 2], f64); 4] = [
    ([F, F], 0.5024),
    ([F, T], 0.1827),
    ([T, F], 0.1753),
    ([T, T], 0.1396),
];

pub(crate) const SCENARIO_2_JOINT: [([bool; 4], f64); 16] = [
    ([F, F, T, T], 0.0981),
    ([F, F, T, F], 0.4128),
    ([T, F, F, T], 0.2525),
    ([T, F, T, F], 0.0122),
    ([T, T, T, T], 0.0257),
    ([T, F, F, F], 0.0486),
    ([T, F, T, T], 0.0472),
    ([F, F, F, T], 0.032),
    ([F, F, F, F], 0.0343),
    ([T, T, T, F], 0.008),
    ([T, T, F, T], 0.0076),
    ([F, T, T, T], 0.0111),
    ([F, T, F, T], 0.0034),
    ([F, T, T, F], 0.0045),
    ([T, T, F, F], 0.0012),
    ([F, T, F, F], 0.0008),
];

pub(crate) const SCENARIO_3_JOINT: [([bool; 6], f64); 64] = [
    ([T, T, T, F, T, F], 0.024882),
    ([T, F, T, F, T, F], 0.266712),
    ([F, T, F, F, T, F], 0.156024),
    ([T, F, T, F, F, F], 0.150536),
    ([F, F, T, F, T, F], 0.04465),
    ([F, F, F, F, T, T], 0.001497),
    ([T, T, F, F, T, F], 0.100461),
    ([T, T, T, F, F, F], 0.018334),
    ([T, F, F, F, T, F], 0.013594),
    ([F, F, T, F, F, F], 0.016026),
    ([T, T, F, F, F, F], 0.06423),
    ([F, T, T, F, T, F], 0.014966),
    ([F, T, F, F, F, F], 0.021701),
    ([T, T, T, T, T, F], 0.002681),
    ([F, F, F, F, T, F], 0.007546),
    ([F, T, T, F, T, T], 0.002869),
    ([T, T, F, T, T, F], 0.003367),
    ([T, T, T, T, T, T], 0.004428),
    ([T, F, T, F, T, T], 0.000935),
    ([F, F, F, T, T, F], 0.000561),
    ([T, T, F, F, T, T], 0.002432),
    ([T, F, T, F, F, T], 0.000748),
    ([T, T, T, F, T, T], 0.001808),
    ([T, F, T, T, T, T], 0.002744),
    ([T, F, T, T, F, F], 0.001996),
    ([F, F, F, F, F, F], 0.012285),
    ([F, T, T, T, F, F], 0.000374),
    ([T, F, F, F, F, F], 0.012222),
    ([T, F, F, T, T, T], 0.001497),
    ([F, T, F, T, T, T], 0.002869),
    ([F, T, F, F, T, T], 0.008044),
    ([T, T, F, T, F, T], 0.000935),
    ([F, F, F, T, F, T], 0.000437),
    ([F, T, T, F, F, F], 0.006174),
    ([T, F, F, T, T, F], 0.001933),
    ([F, F, T, T, F, F], 0.000499),
    ([F, T, F, F, F, T], 0.000748),
    ([F, T, T, T, T, F], 0.000998),
    ([T, F, F, T, F, F], 0.001185),
    ([T, F, F, T, F, T], 0.000686),
    ([F, F, T, F, T, T], 0.001434),
    ([T, F, T, T, T, F], 0.00424),
    ([T, T, F, T, T, T], 0.002494),
    ([F, T, F, T, T, F], 0.001871),
    ([T, T, F, T, F, F], 0.001122),
    ([T, T, F, F, F, T], 0.000249),
    ([F, T, T, T, F, T], 0.000249),
    ([F, T, T, T, T, T], 0.002619),
    ([F, F, F, T, F, F], 0.000249),
    ([F, F, T, F, F, T], 0.000249),
    ([F, F, T, T, F, T], 0.000561),
    ([F, T, T, F, F, T], 0.000935),
    ([F, F, T, T, T, F], 0.001122),
    ([F, F, F, T, T, T], 0.000624),
    ([T, T, T, T, F, T], 0.000998),
    ([T, T, T, T, F, F], 0.001372),
    ([T, F, T, T, F, T], 0.000748),
    ([F, F, T, T, T, T], 0.000499),
    ([F, T, F, T, F, T], 0.000499),
    ([T, F, F, F, F, T], 6.2e-05),
    ([T, F, F, F, T, T], 0.000561),
    ([T, T, T, F, F, T], 0.000125),
    ([F, F, F, F, F, T], 0.000125),
    ([F, T, F, T, F, F], 0.000374),
];
