//! Public façade over the engine, endpoints and mapper.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::{
    Car, CarriageSearch, Direction, RoundTrip, RoundTripSearch, RouteSearch, Station,
    StationSearch, TrainRoute, flag, format_date, format_time, yes_no,
};

use super::config::RzdConfig;
use super::convert;
use super::endpoints::Endpoints;
use super::engine::{Engine, RetryPolicy};
use super::error::RzdError;
use super::request::RequestDescriptor;
use super::session::{Clock, SystemClock, TokenCache};
use super::transport::{HttpTransport, Transport};
use super::types::{CarriageResponse, RouteResponse, StationSchema};

/// Client for the timetable service.
///
/// One client holds one session token cache; share it (e.g. behind an
/// `Arc`) rather than building one per request.
#[derive(Debug)]
pub struct RzdClient<T = HttpTransport> {
    engine: Engine<T>,
    endpoints: Endpoints,
    policy: RetryPolicy,
    language: String,
}

impl RzdClient<HttpTransport> {
    /// Create a client that talks HTTP to the configured base path.
    pub fn new(config: &RzdConfig) -> Result<Self, RzdError> {
        let transport = HttpTransport::new(config)?;
        Self::with_transport(config, transport, Arc::new(SystemClock))
    }
}

impl<T: Transport> RzdClient<T> {
    /// Create a client over any transport and clock.
    pub fn with_transport(
        config: &RzdConfig,
        transport: T,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RzdError> {
        let endpoints = Endpoints::new(&config.base_path, &config.language)
            .map_err(|e| RzdError::Config(e.to_string()))?;

        Ok(Self {
            engine: Engine::new(transport, TokenCache::new(clock)),
            endpoints,
            policy: config.retry_policy(),
            language: config.language.clone(),
        })
    }

    pub fn engine(&self) -> &Engine<T> {
        &self.engine
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Default response language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Find trains between two stations on a date.
    pub async fn search_routes(
        &self,
        search: &RouteSearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<TrainRoute>, RzdError> {
        let request = RequestDescriptor::post(self.endpoints.train_routes.clone())
            .param("dir", Direction::OneWay.code().to_string())
            .param("tfl", search.train_type.code().to_string())
            .param("checkSeats", flag(search.check_seats))
            .param("code0", search.from.to_string())
            .param("code1", search.to.to_string())
            .param("dt0", format_date(search.date))
            .param("md", flag(search.with_change));

        let body = self.engine.execute(&request, &self.policy, cancel).await?;
        let response: RouteResponse = convert::decode(&body)?;
        let routes = convert::convert_routes(&response)?;

        info!(
            from = %search.from,
            to = %search.to,
            date = %search.date,
            trains = routes.len(),
            "route search complete"
        );
        Ok(routes)
    }

    /// Find outbound and return trains in one query.
    pub async fn search_routes_return(
        &self,
        search: &RoundTripSearch,
        cancel: &CancellationToken,
    ) -> Result<RoundTrip, RzdError> {
        if search.return_date < search.date {
            return Err(RzdError::InvalidRequest(format!(
                "return date {} is before departure date {}",
                search.return_date, search.date
            )));
        }

        let request = RequestDescriptor::post(self.endpoints.train_routes.clone())
            .param("dir", Direction::Return.code().to_string())
            .param("tfl", search.train_type.code().to_string())
            .param("checkSeats", flag(search.check_seats))
            .param("code0", search.from.to_string())
            .param("code1", search.to.to_string())
            .param("dt0", format_date(search.date))
            .param("dt1", format_date(search.return_date));

        let body = self.engine.execute(&request, &self.policy, cancel).await?;
        let response: RouteResponse = convert::decode(&body)?;
        let trip = convert::convert_round_trip(&response)?;

        info!(
            from = %search.from,
            to = %search.to,
            forward = trip.forward.len(),
            back = trip.back.len(),
            "round-trip search complete"
        );
        Ok(trip)
    }

    /// List the carriages of one train.
    pub async fn search_carriages(
        &self,
        search: &CarriageSearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<Car>, RzdError> {
        let train_number = search.train_number.trim();
        if train_number.is_empty() {
            return Err(RzdError::InvalidRequest("train number is empty".to_string()));
        }

        let request = RequestDescriptor::post(self.endpoints.train_carriages.clone())
            .param("dir", search.direction.code().to_string())
            .param("code0", search.from.to_string())
            .param("code1", search.to.to_string())
            .param("tnum0", train_number)
            .param("time0", format_time(search.departure.time()))
            .param("dt0", format_date(search.departure.date()));

        let body = self.engine.execute(&request, &self.policy, cancel).await?;
        let response: CarriageResponse = convert::decode(&body)?;
        let cars = convert::convert_cars(&response)?;

        info!(train = train_number, cars = cars.len(), "carriage search complete");
        Ok(cars)
    }

    /// Suggest stations whose names start with the query.
    pub async fn search_stations(
        &self,
        search: &StationSearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<Station>, RzdError> {
        let query = search.query.trim();
        if query.is_empty() {
            return Err(RzdError::InvalidRequest("station query is empty".to_string()));
        }

        let language = search.language.as_deref().unwrap_or(&self.language);
        let request = RequestDescriptor::get(self.endpoints.station_search.clone())
            .param("stationNamePart", query)
            .param("compactMode", yes_no(search.compact))
            .param("lang", language);

        let body = self.engine.execute(&request, &self.policy, cancel).await?;
        let response: Vec<StationSchema> = convert::decode(&body)?;
        let stations = convert::convert_stations(&response);

        info!(query, stations = stations.len(), "station search complete");
        Ok(stations)
    }
}
