use async_trait::async_trait;
use log::debug;
use regex::Regex;
use scooby::postgres::{select, Parameters, Select};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, SqliteConnection};
use std::{
    collections::BTreeMap,
    sync::{Arc, LazyLock},
};
use time::Date;

use super::{schema::measurement, Database};
use crate::{iso_date, Error};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("placeholder pattern is valid"));

/// Precipitation readings keyed by date, readings kept in row order.
pub type Precipitation = BTreeMap<String, Vec<Option<f64>>>;

/// Result of a single-column aggregate, one row per result row.
///
/// Serializes as `[[value]]`; callers keep the row shape rather than
/// flattening it to a scalar.
pub type AggregateRows = Vec<(Option<f64>,)>;

/// A `(date, tobs)` pair, serialized as a two element array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation(pub String, pub Option<f64>);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemperatureSummary {
    pub min: AggregateRows,
    pub avg: AggregateRows,
    pub max: AggregateRows,
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// All precipitation readings on or after `since`, grouped by date.
    async fn precipitation(&self, since: Date) -> Result<Precipitation, Error>;
    /// Distinct station ids seen in the measurement table.
    async fn stations(&self) -> Result<Vec<String>, Error>;
    async fn temperature_observations(
        &self,
        station: &str,
        since: Date,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    /// MIN/AVG/MAX of tobs for every row on or after `start`.
    async fn temperatures_from(&self, start: Date) -> Result<TemperatureSummary, Error>;
    /// MIN/AVG/MAX of tobs between `start` and `end`, both inclusive.
    async fn temperatures_between(&self, start: Date, end: Date)
        -> Result<TemperatureSummary, Error>;
}

pub struct ClimateAccess {
    db: Arc<Database>,
}

impl ClimateAccess {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Runs a scooby select on the given connection, rewriting its `$N`
    /// placeholders into the positional `?` form SQLite binds against.
    async fn query<T>(
        conn: &mut SqliteConnection,
        select: Select,
        params: Vec<String>,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let binding = select.to_string();
        let fixed_params = PLACEHOLDER.replace_all(&binding, "?");
        debug!("running query: {} {:?}", fixed_params, params);

        let mut query = sqlx::query_as::<_, T>(fixed_params.as_ref());
        for param in params {
            query = query.bind(param);
        }
        query.fetch_all(conn).await
    }

    async fn summarize(&self, start: Date, end: Option<Date>) -> Result<TemperatureSummary, Error> {
        let mut conn = self.db.session().await?;

        let mut summary = TemperatureSummary::default();
        for (aggregate, rows) in [
            ("MIN", &mut summary.min),
            ("AVG", &mut summary.avg),
            ("MAX", &mut summary.max),
        ] {
            let mut placeholders = Parameters::new();
            let mut values = vec![iso_date(start)];

            let mut query = select(format!("{}({})", aggregate, measurement::TOBS))
                .from(measurement::TABLE)
                .where_(format!("{} >= {}", measurement::DATE, placeholders.next()));

            if let Some(end) = end {
                query = query.where_(format!("{} <= {}", measurement::DATE, placeholders.next()));
                values.push(iso_date(end));
            }

            *rows = Self::query(&mut *conn, query, values).await?;
        }

        Ok(summary)
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn precipitation(&self, since: Date) -> Result<Precipitation, Error> {
        let mut conn = self.db.session().await?;
        let mut placeholders = Parameters::new();

        let query = select((measurement::DATE, measurement::PRCP))
            .from(measurement::TABLE)
            .where_(format!("{} >= {}", measurement::DATE, placeholders.next()));

        let rows: Vec<(String, Option<f64>)> =
            Self::query(&mut *conn, query, vec![iso_date(since)]).await?;

        let readings = rows
            .into_iter()
            .fold(Precipitation::new(), |mut acc, (date, prcp)| {
                acc.entry(date).or_default().push(prcp);
                acc
            });
        Ok(readings)
    }

    async fn stations(&self) -> Result<Vec<String>, Error> {
        let mut conn = self.db.session().await?;

        let query = select(measurement::STATION)
            .from(measurement::TABLE)
            .group_by(measurement::STATION);

        let rows: Vec<(String,)> = Self::query(&mut *conn, query, vec![]).await?;
        Ok(rows.into_iter().map(|(station,)| station).collect())
    }

    async fn temperature_observations(
        &self,
        station: &str,
        since: Date,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        let mut conn = self.db.session().await?;
        let mut placeholders = Parameters::new();

        let query = select((measurement::DATE, measurement::TOBS))
            .from(measurement::TABLE)
            .where_(format!("{} = {}", measurement::STATION, placeholders.next()))
            .where_(format!("{} >= {}", measurement::DATE, placeholders.next()));

        let rows: Vec<(String, Option<f64>)> =
            Self::query(&mut *conn, query, vec![station.to_string(), iso_date(since)]).await?;

        Ok(rows
            .into_iter()
            .map(|(date, tobs)| TemperatureObservation(date, tobs))
            .collect())
    }

    async fn temperatures_from(&self, start: Date) -> Result<TemperatureSummary, Error> {
        self.summarize(start, None).await
    }

    async fn temperatures_between(
        &self,
        start: Date,
        end: Date,
    ) -> Result<TemperatureSummary, Error> {
        self.summarize(start, Some(end)).await
    }
}
