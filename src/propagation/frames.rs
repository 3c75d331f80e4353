// WGS-84 constants
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.00669437999014;

/// Rotate a TEME position into ECEF using Greenwich mean sidereal time.
pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// ECEF position to geodetic (latitude deg, longitude deg, altitude km),
/// iterating the WGS-84 latitude equation to convergence.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let p = (x * x + y * y).sqrt();

    // Near the poles the longitude is undefined and the iteration below
    // degenerates; fall back to the axis solution.
    if p < 1e-9 {
        let b = WGS84_A_KM * (1.0 - WGS84_E2).sqrt();
        let lat = if z >= 0.0 { 90.0 } else { -90.0 };
        return (lat, 0.0, z.abs() - b);
    }

    let lon = y.atan2(x);
    let mut lat = (z / (p * (1.0 - WGS84_E2))).atan();
    let mut alt = 0.0;
    for _ in 0..5 {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        alt = p / lat.cos() - n;
        lat = (z / (p * (1.0 - WGS84_E2 * n / (n + alt)))).atan();
    }

    (lat.to_degrees(), lon.to_degrees(), alt)
}
