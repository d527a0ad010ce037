//! In-memory store for the SSP model cube and ionizing-photon table.
//!
//! Parsing the cube and table out of their on-disk formats is an external
//! collaborator's job; this module receives already-parsed node lists and is
//! responsible for validation:
//!
//! - every (metallicity, age) combination present exactly once (dense grid)
//! - axes strictly increasing after sorting (duplicates are an error)
//! - metallicities strictly positive (interpolation runs in log10 Z)
//! - every node's flux array matching the shared wavelength grid
//! - the photon table spanning exactly the cube's coordinate set
//!
//! After `load` the store is immutable and safe to share across evaluation
//! threads without locking.

use crate::error::ModelError;

/// One SSP model node: the rest-frame spectrum computed for a single
/// (metallicity, age) combination, on the cube's shared wavelength grid.
#[derive(Debug, Clone)]
pub struct SspNode {
    /// Metallicity as a linear mass fraction (e.g. 0.02).
    pub metallicity: f64,
    /// log10 age in years.
    pub log_age: f64,
    /// Luminosity density per wavelength sample.
    pub flux: Vec<f64>,
}

/// The parsed SSP model cube: a shared wavelength grid plus one node per
/// (metallicity, age) combination.
#[derive(Debug, Clone)]
pub struct SspCube {
    /// Wavelength grid in Angstrom, strictly increasing, shared by all nodes.
    pub wavelength: Vec<f64>,
    pub nodes: Vec<SspNode>,
}

/// One ionizing-photon entry: log10 of the photon production rate for a
/// single (metallicity, age) combination.
#[derive(Debug, Clone, Copy)]
pub struct PhotonNode {
    pub metallicity: f64,
    pub log_age: f64,
    pub log_rate: f64,
}

/// The parsed ionizing-photon table accompanying a model cube.
#[derive(Debug, Clone)]
pub struct PhotonTable {
    pub nodes: Vec<PhotonNode>,
}

/// Validated, immutable model grid.
///
/// Spectra and photon rates are stored densely in (metallicity, age) order;
/// accessors take axis indices, interpolation lives in `grid::interp`.
#[derive(Debug, Clone)]
pub struct GridStore {
    wavelength: Vec<f64>,
    /// Sorted linear metallicities.
    metallicities: Vec<f64>,
    /// log10 of `metallicities`; the interpolation axis.
    log_metallicities: Vec<f64>,
    /// Sorted log10 ages.
    log_ages: Vec<f64>,
    /// Node spectra, indexed `iz * n_ages + ia`.
    flux: Vec<Vec<f64>>,
    /// log10 photon rates in the same layout; `None` when no table was given.
    log_rates: Option<Vec<f64>>,
}

impl GridStore {
    /// Assemble and validate the grid. The photon table is optional; without
    /// it, interpolated photon rates are NaN, which downstream consumers treat
    /// as the "no nebular component" sentinel.
    pub fn load(cube: SspCube, photons: Option<PhotonTable>) -> Result<Self, ModelError> {
        if cube.wavelength.is_empty() {
            return Err(ModelError::GridFormat("wavelength grid is empty".into()));
        }
        if cube.wavelength.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ModelError::GridFormat(
                "wavelength grid must be strictly increasing".into(),
            ));
        }
        if cube.nodes.is_empty() {
            return Err(ModelError::GridFormat("model cube has no nodes".into()));
        }

        let metallicities = unique_axis_values(
            cube.nodes.iter().map(|n| n.metallicity),
            "metallicity",
        )?;
        if metallicities[0] <= 0.0 {
            return Err(ModelError::GridFormat(format!(
                "metallicity axis must be strictly positive, found {}",
                metallicities[0]
            )));
        }
        let log_ages = unique_axis_values(cube.nodes.iter().map(|n| n.log_age), "age")?;

        let n_z = metallicities.len();
        let n_age = log_ages.len();
        let n_wl = cube.wavelength.len();

        // Place every node into the dense layout, rejecting duplicates and,
        // afterwards, any hole left by a missing combination.
        let mut flux: Vec<Option<Vec<f64>>> = vec![None; n_z * n_age];
        for node in cube.nodes {
            if node.flux.len() != n_wl {
                return Err(ModelError::GridFormat(format!(
                    "node (Z={}, log age={}) has {} flux samples, expected {}",
                    node.metallicity,
                    node.log_age,
                    node.flux.len(),
                    n_wl
                )));
            }
            let idx = dense_index(
                &metallicities,
                &log_ages,
                node.metallicity,
                node.log_age,
                "model cube",
            )?;
            if flux[idx].is_some() {
                return Err(ModelError::GridFormat(format!(
                    "duplicate node (Z={}, log age={}) in model cube",
                    node.metallicity, node.log_age
                )));
            }
            flux[idx] = Some(node.flux);
        }
        let flux = collect_dense(flux, &metallicities, &log_ages, "model cube")?;

        let log_rates = match photons {
            None => None,
            Some(table) => {
                let mut rates: Vec<Option<f64>> = vec![None; n_z * n_age];
                for node in table.nodes {
                    let idx = dense_index(
                        &metallicities,
                        &log_ages,
                        node.metallicity,
                        node.log_age,
                        "photon table",
                    )?;
                    if rates[idx].is_some() {
                        return Err(ModelError::GridFormat(format!(
                            "duplicate node (Z={}, log age={}) in photon table",
                            node.metallicity, node.log_age
                        )));
                    }
                    rates[idx] = Some(node.log_rate);
                }
                Some(collect_dense(rates, &metallicities, &log_ages, "photon table")?)
            }
        };

        log::info!(
            "loaded SSP grid: {n_z} metallicities x {n_age} ages x {n_wl} wavelength samples{}",
            if log_rates.is_some() {
                ", with ionizing-photon table"
            } else {
                ", no ionizing-photon table"
            }
        );

        let log_metallicities = metallicities.iter().map(|z| z.log10()).collect();
        Ok(Self {
            wavelength: cube.wavelength,
            metallicities,
            log_metallicities,
            log_ages,
            flux,
            log_rates,
        })
    }

    /// Shared wavelength grid in Angstrom.
    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    /// Sorted metallicity axis (linear mass fraction).
    pub fn metallicities(&self) -> &[f64] {
        &self.metallicities
    }

    /// Sorted metallicity axis in log10, as used for interpolation.
    pub fn log_metallicities(&self) -> &[f64] {
        &self.log_metallicities
    }

    /// Sorted age axis (log10 yr).
    pub fn log_ages(&self) -> &[f64] {
        &self.log_ages
    }

    pub fn has_photon_table(&self) -> bool {
        self.log_rates.is_some()
    }

    /// Spectrum stored at the (metallicity index, age index) node.
    pub fn spectrum_at(&self, iz: usize, ia: usize) -> &[f64] {
        &self.flux[iz * self.log_ages.len() + ia]
    }

    /// log10 photon rate stored at the node; NaN when no table was loaded.
    pub fn log_rate_at(&self, iz: usize, ia: usize) -> f64 {
        match &self.log_rates {
            Some(rates) => rates[iz * self.log_ages.len() + ia],
            None => f64::NAN,
        }
    }
}

/// Sort and deduplicate one coordinate axis, rejecting non-finite values.
fn unique_axis_values(
    values: impl Iterator<Item = f64>,
    axis: &'static str,
) -> Result<Vec<f64>, ModelError> {
    let mut out: Vec<f64> = Vec::new();
    for v in values {
        if !v.is_finite() {
            return Err(ModelError::GridFormat(format!(
                "{axis} axis contains a non-finite value"
            )));
        }
        out.push(v);
    }
    out.sort_by(f64::total_cmp);
    out.dedup();
    Ok(out)
}

/// Dense index of an exact (metallicity, age) coordinate pair.
fn dense_index(
    metallicities: &[f64],
    log_ages: &[f64],
    z: f64,
    log_age: f64,
    source: &str,
) -> Result<usize, ModelError> {
    let iz = metallicities
        .binary_search_by(|v| v.total_cmp(&z))
        .map_err(|_| {
            ModelError::GridFormat(format!(
                "{source} has node with metallicity {z} not on the cube's metallicity axis"
            ))
        })?;
    let ia = log_ages
        .binary_search_by(|v| v.total_cmp(&log_age))
        .map_err(|_| {
            ModelError::GridFormat(format!(
                "{source} has node with log age {log_age} not on the cube's age axis"
            ))
        })?;
    Ok(iz * log_ages.len() + ia)
}

/// Unwrap the dense layout, naming the first missing combination.
fn collect_dense<T>(
    slots: Vec<Option<T>>,
    metallicities: &[f64],
    log_ages: &[f64],
    source: &str,
) -> Result<Vec<T>, ModelError> {
    let n_age = log_ages.len();
    slots
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.ok_or_else(|| {
                ModelError::GridFormat(format!(
                    "{source} is missing node (Z={}, log age={})",
                    metallicities[idx / n_age],
                    log_ages[idx % n_age]
                ))
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::{flat_cube, photon_table};
    use super::*;

    fn toy_wavelength() -> Vec<f64> {
        (0..5).map(|i| 3000.0 + 500.0 * i as f64).collect()
    }

    #[test]
    fn load_sorts_axes_and_stores_nodes() {
        let mets = [0.02, 0.001];
        let ages = [7.0, 6.0];
        let cube = flat_cube(toy_wavelength(), &mets, &ages, |z, a| z * 100.0 + a);
        let store = GridStore::load(cube, None).unwrap();

        assert_eq!(store.metallicities(), &[0.001, 0.02]);
        assert_eq!(store.log_ages(), &[6.0, 7.0]);
        // Node (Z=0.02, log age=6.0) lands at iz=1, ia=0.
        assert!((store.spectrum_at(1, 0)[0] - 8.0).abs() < 1e-12);
        assert!(store.log_rate_at(0, 0).is_nan());
    }

    #[test]
    fn load_rejects_wavelength_length_mismatch() {
        let mut cube = flat_cube(toy_wavelength(), &[0.001, 0.02], &[6.0, 7.0], |_, _| 1.0);
        cube.nodes[2].flux.pop();
        let err = GridStore::load(cube, None).unwrap_err();
        assert!(matches!(err, ModelError::GridFormat(_)), "{err}");
    }

    #[test]
    fn load_rejects_missing_combination() {
        let mut cube = flat_cube(toy_wavelength(), &[0.001, 0.02], &[6.0, 7.0], |_, _| 1.0);
        cube.nodes.remove(3);
        let err = GridStore::load(cube, None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing node"), "{msg}");
    }

    #[test]
    fn load_rejects_duplicate_node() {
        let mut cube = flat_cube(toy_wavelength(), &[0.001, 0.02], &[6.0, 7.0], |_, _| 1.0);
        let dup = cube.nodes[0].clone();
        cube.nodes.push(dup);
        let err = GridStore::load(cube, None).unwrap_err();
        assert!(err.to_string().contains("duplicate node"), "{err}");
    }

    #[test]
    fn load_rejects_non_positive_metallicity() {
        let cube = flat_cube(toy_wavelength(), &[0.0, 0.02], &[6.0], |_, _| 1.0);
        let err = GridStore::load(cube, None).unwrap_err();
        assert!(err.to_string().contains("strictly positive"), "{err}");
    }

    #[test]
    fn load_rejects_photon_table_off_the_cube_axes() {
        let cube = flat_cube(toy_wavelength(), &[0.001, 0.02], &[6.0, 7.0], |_, _| 1.0);
        let mut table = photon_table(&[0.001, 0.02], &[6.0, 7.0], |_, _| 52.0);
        table.nodes[0].metallicity = 0.004;
        let err = GridStore::load(cube, Some(table)).unwrap_err();
        assert!(err.to_string().contains("photon table"), "{err}");
    }

    #[test]
    fn load_rejects_incomplete_photon_table() {
        let cube = flat_cube(toy_wavelength(), &[0.001, 0.02], &[6.0, 7.0], |_, _| 1.0);
        let mut table = photon_table(&[0.001, 0.02], &[6.0, 7.0], |_, _| 52.0);
        table.nodes.pop();
        let err = GridStore::load(cube, Some(table)).unwrap_err();
        assert!(err.to_string().contains("missing node"), "{err}");
    }

    #[test]
    fn photon_rates_stored_in_grid_layout() {
        let cube = flat_cube(toy_wavelength(), &[0.001, 0.02], &[6.0, 7.0], |_, _| 1.0);
        let table = photon_table(&[0.001, 0.02], &[6.0, 7.0], |z, a| {
            50.0 + z * 10.0 + (a - 6.0)
        });
        let store = GridStore::load(cube, Some(table)).unwrap();
        assert!(store.has_photon_table());
        assert!((store.log_rate_at(1, 1) - (50.0 + 0.2 + 1.0)).abs() < 1e-12);
    }
}
