//! Bilinear interpolation over the model grid.
//!
//! Queries arrive in the sampled parameterization (log10 age, log10
//! metallicity) and are resolved against the store's axes:
//!
//! - bracketing node indices on each axis come from binary search
//! - queries outside the axis range clamp to the boundary node; the grids
//!   are never extrapolated, because population-synthesis models are
//!   meaningless outside their computed range
//! - a query exactly on a node takes that node with weight 1, so the
//!   degenerate bracket never divides by a zero segment
//!
//! Spectra interpolate independently at every wavelength sample; the photon
//! rate interpolates in log10-rate space, as stored.

use crate::error::ModelError;
use crate::grid::GridStore;
use crate::math::bracket;

impl GridStore {
    /// Interpolated spectrum and log10 photon rate at (log age, log
    /// metallicity).
    ///
    /// Fails only when the grid has fewer than 2 nodes on either axis; all
    /// other queries succeed via clamping. When no photon table is loaded the
    /// returned rate is NaN (the "no nebular component" sentinel).
    pub fn interpolate(
        &self,
        log_age: f64,
        log_metallicity: f64,
    ) -> Result<(Vec<f64>, f64), ModelError> {
        if self.log_ages().len() < 2 {
            return Err(ModelError::Interpolation {
                axis: "age",
                count: self.log_ages().len(),
            });
        }
        if self.metallicities().len() < 2 {
            return Err(ModelError::Interpolation {
                axis: "metallicity",
                count: self.metallicities().len(),
            });
        }

        let (ia0, ia1, ta) = bracket(self.log_ages(), log_age);
        let (iz0, iz1, tz) = bracket(self.log_metallicities(), log_metallicity);

        let w00 = (1.0 - tz) * (1.0 - ta);
        let w01 = (1.0 - tz) * ta;
        let w10 = tz * (1.0 - ta);
        let w11 = tz * ta;

        let f00 = self.spectrum_at(iz0, ia0);
        let f01 = self.spectrum_at(iz0, ia1);
        let f10 = self.spectrum_at(iz1, ia0);
        let f11 = self.spectrum_at(iz1, ia1);

        let flux: Vec<f64> = (0..self.wavelength().len())
            .map(|i| w00 * f00[i] + w01 * f01[i] + w10 * f10[i] + w11 * f11[i])
            .collect();

        let log_rate = w00 * self.log_rate_at(iz0, ia0)
            + w01 * self.log_rate_at(iz0, ia1)
            + w10 * self.log_rate_at(iz1, ia0)
            + w11 * self.log_rate_at(iz1, ia1);

        Ok((flux, log_rate))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ModelError;
    use crate::grid::store::test_support::{flat_cube, photon_table};
    use crate::grid::{GridStore, SspCube, SspNode};

    const METS: [f64; 2] = [0.001, 0.02];
    const AGES: [f64; 2] = [6.0, 7.0];

    fn toy_store(level: impl Fn(f64, f64) -> f64) -> GridStore {
        let wl: Vec<f64> = (0..4).map(|i| 3000.0 + 1000.0 * i as f64).collect();
        let cube = flat_cube(wl, &METS, &AGES, level);
        let table = photon_table(&METS, &AGES, |z, a| 50.0 + 100.0 * z + (a - 6.0));
        GridStore::load(cube, Some(table)).unwrap()
    }

    #[test]
    fn exact_at_grid_nodes() {
        let store = toy_store(|z, a| 1000.0 * z + a);
        for &z in &METS {
            for &a in &AGES {
                let (flux, rate) = store.interpolate(a, z.log10()).unwrap();
                let expected = 1000.0 * z + a;
                for f in &flux {
                    assert!((f - expected).abs() < 1e-12, "node (Z={z}, age={a})");
                }
                let expected_rate = 50.0 + 100.0 * z + (a - 6.0);
                assert!((rate - expected_rate).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn interior_flux_bounded_by_bracketing_nodes() {
        let store = toy_store(|z, a| 1000.0 * z + 10.0 * a);
        // Between the two age nodes at fixed metallicity node.
        let (flux, _) = store.interpolate(6.3, 0.001f64.log10()).unwrap();
        let lo = 1000.0 * 0.001 + 60.0;
        let hi = 1000.0 * 0.001 + 70.0;
        for f in &flux {
            assert!(*f > lo && *f < hi, "flux {f} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn metallicity_weights_are_logarithmic() {
        let store = toy_store(|z, _| if z < 0.01 { 0.0 } else { 1.0 });
        // log10(0.005) sits 53.7% of the way from log10(0.001) to log10(0.02).
        let (flux, _) = store.interpolate(6.0, 0.005f64.log10()).unwrap();
        let t = (0.005f64.log10() - 0.001f64.log10()) / (0.02f64.log10() - 0.001f64.log10());
        for f in &flux {
            assert!((f - t).abs() < 1e-12);
        }
    }

    #[test]
    fn out_of_range_queries_clamp_to_boundary_nodes() {
        let store = toy_store(|z, a| 1000.0 * z + a);
        let (young, _) = store.interpolate(3.0, 0.001f64.log10()).unwrap();
        let (node, _) = store.interpolate(6.0, 0.001f64.log10()).unwrap();
        assert_eq!(young, node);

        let (rich, _) = store.interpolate(6.5, 0.0).unwrap();
        let (edge, _) = store.interpolate(6.5, 0.02f64.log10()).unwrap();
        assert_eq!(rich, edge);
    }

    #[test]
    fn single_node_axis_is_an_error() {
        let wl = vec![3000.0, 4000.0];
        let cube = SspCube {
            wavelength: wl,
            nodes: vec![
                SspNode {
                    metallicity: 0.02,
                    log_age: 6.0,
                    flux: vec![1.0, 1.0],
                },
                SspNode {
                    metallicity: 0.02,
                    log_age: 7.0,
                    flux: vec![1.0, 1.0],
                },
            ],
        };
        let store = GridStore::load(cube, None).unwrap();
        let err = store.interpolate(6.5, -2.0).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Interpolation {
                axis: "metallicity",
                count: 1
            }
        ));
    }

    #[test]
    fn missing_photon_table_yields_nan_rate() {
        let wl: Vec<f64> = (0..4).map(|i| 3000.0 + 1000.0 * i as f64).collect();
        let cube = flat_cube(wl, &METS, &AGES, |_, _| 1.0);
        let store = GridStore::load(cube, None).unwrap();
        let (_, rate) = store.interpolate(6.5, -2.3).unwrap();
        assert!(rate.is_nan());
    }
}
