use anyhow::Context;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_valid::Validate;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use strum::Display;

/// Parse the audit project file, which names the input tables on disk and the
/// improvement scenarios to evaluate against them.
pub fn read_audit_project(json: impl Read) -> anyhow::Result<AuditProject> {
    serde_json::from_reader(json).context("parsing audit project file")
}

/// Resolve and read every table the project names, relative to `base_dir`
/// (conventionally the directory holding the project file).
pub fn load_data_set(base_dir: &Path, project: &AuditProject) -> anyhow::Result<ModelDataSet> {
    Ok(ModelDataSet {
        climate: read_climate_records(open_table(base_dir, &project.climate)?)?,
        components: read_envelope_components(open_table(base_dir, &project.building_components)?)?,
        solar_coefficients: read_solar_coefficients(open_table(
            base_dir,
            &project.solar_heat_gain_coefficients,
        )?)?,
        solar_geometry: read_solar_geometry(open_table(base_dir, &project.solar_geometry)?)?,
        gas_bills: read_utility_bills(open_table(base_dir, &project.gas_bills)?)?,
        cooling_bills: read_utility_bills(open_table(
            base_dir,
            &project.cooling_electricity_bills,
        )?)?,
    })
}

/// Build the data set for one improvement scenario: start from the base data
/// set and re-read whichever tables the scenario substitutes.
pub fn load_improvement_data_set(
    base_dir: &Path,
    improvement: &ImprovementSpec,
    base: &ModelDataSet,
) -> anyhow::Result<ModelDataSet> {
    let mut data = base.clone();
    if let Some(path) = &improvement.building_components {
        data.components = read_envelope_components(open_table(base_dir, path)?)?;
    }
    if let Some(path) = &improvement.solar_heat_gain_coefficients {
        data.solar_coefficients = read_solar_coefficients(open_table(base_dir, path)?)?;
    }
    if let Some(path) = &improvement.solar_geometry {
        data.solar_geometry = read_solar_geometry(open_table(base_dir, path)?)?;
    }
    Ok(data)
}

fn open_table(base_dir: &Path, path: &Path) -> anyhow::Result<BufReader<File>> {
    let resolved = base_dir.join(path);
    let file =
        File::open(&resolved).with_context(|| format!("opening table {}", resolved.display()))?;
    Ok(BufReader::new(file))
}

pub fn read_climate_records(reader: impl Read) -> anyhow::Result<Vec<ClimateRecord>> {
    read_table(reader, "climate")
}

pub fn read_envelope_components(reader: impl Read) -> anyhow::Result<Vec<EnvelopeComponent>> {
    read_table(reader, "building component")
}

pub fn read_solar_coefficients(reader: impl Read) -> anyhow::Result<Vec<SolarCoefficientRow>> {
    read_table(reader, "solar heat gain coefficient")
}

pub fn read_solar_geometry(reader: impl Read) -> anyhow::Result<Vec<SolarGeometryRow>> {
    read_table(reader, "solar geometry")
}

pub fn read_utility_bills(reader: impl Read) -> anyhow::Result<Vec<UtilityBill>> {
    read_table(reader, "utility bill")
}

fn read_table<T: DeserializeOwned + Validate>(
    reader: impl Read,
    what: &str,
) -> anyhow::Result<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<T>().enumerate() {
        let row = record.with_context(|| format!("parsing {what} record {}", index + 1))?;
        row.validate()
            .map_err(|errors| anyhow::anyhow!("{what} record {} is invalid: {errors}", index + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// The audit project file. Table paths are interpreted relative to the
/// directory the project file sits in.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditProject {
    pub climate: PathBuf,
    pub building_components: PathBuf,
    pub solar_heat_gain_coefficients: PathBuf,
    pub solar_geometry: PathBuf,
    pub gas_bills: PathBuf,
    pub cooling_electricity_bills: PathBuf,
    #[serde(default)]
    pub improvements: Vec<ImprovementSpec>,
}

/// One candidate improvement: a capital cost plus whichever model inputs the
/// improved dwelling changes. Tables left unnamed are inherited from the base
/// data set.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImprovementSpec {
    pub name: String,
    pub capital_cost: f64,
    pub ventilation_factor: Option<f64>,
    pub building_components: Option<PathBuf>,
    pub solar_heat_gain_coefficients: Option<PathBuf>,
    pub solar_geometry: Option<PathBuf>,
}

/// The six parsed tables a model is built from.
#[derive(Clone, Debug)]
pub struct ModelDataSet {
    pub climate: Vec<ClimateRecord>,
    pub components: Vec<EnvelopeComponent>,
    pub solar_coefficients: Vec<SolarCoefficientRow>,
    pub solar_geometry: Vec<SolarGeometryRow>,
    pub gas_bills: Vec<UtilityBill>,
    pub cooling_bills: Vec<UtilityBill>,
}

/// Climate normals for one calendar month. Fluxes are daylight-hour averages
/// on a horizontal surface, in W/m².
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
pub struct ClimateRecord {
    #[validate(minimum = 1)]
    #[validate(maximum = 12)]
    pub month: u32,
    #[validate(minimum = 28)]
    #[validate(maximum = 31)]
    pub days: u32,
    pub air_temp: f64,
    #[validate(minimum = 0.)]
    pub daylight_hours: f64,
    #[validate(minimum = 0.)]
    pub beam_flux: f64,
    #[validate(minimum = 0.)]
    pub diffuse_flux: f64,
}

/// One envelope component of the dwelling (a wall, roof, floor, window or
/// door face). `u_value` is thermal transmittance in W/(m²·K).
#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
pub struct EnvelopeComponent {
    pub name: String,
    pub kind: ComponentKind,
    pub orientation: Option<Orientation>,
    #[validate(minimum = 0.)]
    pub area: f64,
    #[validate(minimum = 0.)]
    pub u_value: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub enum ComponentKind {
    #[serde(rename = "O", alias = "opaque")]
    Opaque,
    #[serde(rename = "G", alias = "glazing")]
    Glazing,
}

/// Compass orientation of a vertical envelope face.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq)]
pub enum Orientation {
    #[serde(rename = "N")]
    #[strum(serialize = "N")]
    North,
    #[serde(rename = "NE")]
    #[strum(serialize = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    #[strum(serialize = "E")]
    East,
    #[serde(rename = "SE")]
    #[strum(serialize = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    #[strum(serialize = "S")]
    South,
    #[serde(rename = "SW")]
    #[strum(serialize = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    #[strum(serialize = "W")]
    West,
    #[serde(rename = "NW")]
    #[strum(serialize = "NW")]
    NorthWest,
}

/// Solar heat gain coefficient for one incidence angle bucket. The reserved
/// angle −1 holds the coefficient applied to diffuse radiation.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
pub struct SolarCoefficientRow {
    #[validate(minimum = -1)]
    #[validate(maximum = 90)]
    pub angle: i32,
    #[validate(minimum = 0.)]
    pub coefficient: f64,
}

/// Beam incidence geometry for a run of months and one orientation: the angle
/// the sun strikes a vertical face at, and the percentage of daylight hours
/// the face sees direct beam radiation.
#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
pub struct SolarGeometryRow {
    #[serde(deserialize_with = "deserialize_month_list")]
    pub months: Vec<u32>,
    pub orientation: Orientation,
    #[validate(minimum = 0)]
    #[validate(maximum = 90)]
    pub incidence_angle: i32,
    #[validate(minimum = 0.)]
    #[validate(maximum = 100.)]
    pub exposure_percent: f64,
}

/// A utility bill, actual or modelled, covering the period from mid
/// `start_month` to mid `end_month`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
pub struct UtilityBill {
    #[validate(minimum = 1)]
    #[validate(maximum = 12)]
    pub start_month: u32,
    #[validate(minimum = 1)]
    #[validate(maximum = 12)]
    pub end_month: u32,
    #[validate(minimum = 0.)]
    pub usage: f64,
    pub cost: f64,
    #[validate(minimum = 0.)]
    pub rate: f64,
}

// Month lists come in as one comma-separated field ("11,12,1,2") so a
// geometry row can cover a whole season.
fn deserialize_month_list<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.split(',')
        .map(|part| {
            part.trim().parse::<u32>().map_err(|_| {
                serde::de::Error::custom(format!("invalid month number {part:?} in months list"))
            })
        })
        .try_collect()
}
