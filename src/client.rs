use chrono::{DateTime, FixedOffset, NaiveDate};
use std::time::Duration;

use crate::config::load_config;
use crate::error::{Error, Result};
use crate::model::{Intensity, IntensityFactors, Statistics};
use crate::request::Resource;
use crate::response::{api_error, decode_factors, decode_intensities, decode_statistics, single};
use crate::transport::{HttpTransport, Transport};
use crate::util::urljoin;

/// Production API host.
pub const DEFAULT_URL: &str = "https://api.carbonintensity.org.uk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base API URL, typically `https://api.carbonintensity.org.uk`.
    pub url: String,
    /// Per-request timeout handed to the HTTP transport. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// Client for the carbon intensity API.
///
/// Every call validates its arguments, issues exactly one GET and decodes the
/// reply; nothing is cached or retried. The client holds no mutable state and
/// can be shared between threads.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    url: String,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client for the production API.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client using environment variables and/or `.carbonintensityrc`.
    ///
    /// This is equivalent to `Client::from_env_with(None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`timeout` arguments
    /// - environment variables `CARBONINTENSITY_URL` / `CARBONINTENSITY_TIMEOUT`
    /// - config file from `CARBONINTENSITY_RC` or `.carbonintensityrc`
    /// - the production defaults
    pub fn from_env_with(url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        Self::with_config(load_config(url, timeout)?)
    }

    /// Creates a client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config.url, transport))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client sending requests for `url` through `transport`.
    pub fn with_transport(url: impl Into<String>, transport: T) -> Self {
        Self {
            url: url.into(),
            transport,
        }
    }

    /// Base address every resource path is joined to.
    pub fn base_url(&self) -> &str {
        &self.url
    }

    /// Intensity for the current half-hour period.
    pub fn current_intensity(&self) -> Result<Intensity> {
        self.request(Resource::Current, |body| {
            single(decode_intensities(body)?, body)
        })
    }

    /// Intensity for the half-hour period containing `at`.
    pub fn intensity_at(&self, at: impl Into<DateTime<FixedOffset>>) -> Result<Intensity> {
        self.request(Resource::At(at.into()), |body| {
            single(decode_intensities(body)?, body)
        })
    }

    /// Intensity for every settlement period of `date`.
    pub fn intensity_for_date(&self, date: NaiveDate) -> Result<Vec<Intensity>> {
        self.request(Resource::Date(date), decode_intensities)
    }

    /// Intensity for one settlement period of `date`.
    ///
    /// The day is split into 48 half-hour settlement periods, numbered from 1
    /// and following UK local time.
    pub fn intensity_for_settlement_period(
        &self,
        date: NaiveDate,
        period: u32,
    ) -> Result<Intensity> {
        self.request(Resource::settlement_period(date, period)?, |body| {
            single(decode_intensities(body)?, body)
        })
    }

    /// Intensity for every settlement period of the current day.
    pub fn todays_intensity(&self) -> Result<Vec<Intensity>> {
        self.request(Resource::Today, decode_intensities)
    }

    /// Intensity for every half-hour period in `from..to`, at most 30 days apart.
    pub fn intensity_between(
        &self,
        from: impl Into<DateTime<FixedOffset>>,
        to: impl Into<DateTime<FixedOffset>>,
    ) -> Result<Vec<Intensity>> {
        self.request(
            Resource::between(from.into(), to.into())?,
            decode_intensities,
        )
    }

    /// Intensity for the 24 hours starting at `from`.
    pub fn next_24h_intensity(
        &self,
        from: impl Into<DateTime<FixedOffset>>,
    ) -> Result<Vec<Intensity>> {
        self.request(Resource::Forward24h(from.into()), decode_intensities)
    }

    /// Intensity for the 48 hours starting at `from`.
    pub fn next_48h_intensity(
        &self,
        from: impl Into<DateTime<FixedOffset>>,
    ) -> Result<Vec<Intensity>> {
        self.request(Resource::Forward48h(from.into()), decode_intensities)
    }

    /// Intensity for the 24 hours ending at `from`.
    pub fn prior_24h_intensity(
        &self,
        from: impl Into<DateTime<FixedOffset>>,
    ) -> Result<Vec<Intensity>> {
        self.request(Resource::Past24h(from.into()), decode_intensities)
    }

    /// Emission factors for each fuel type.
    pub fn intensity_factors(&self) -> Result<IntensityFactors> {
        self.request(Resource::Factors, decode_factors)
    }

    /// Max, average and min intensity over `from..to`, at most 30 days apart.
    pub fn statistics(
        &self,
        from: impl Into<DateTime<FixedOffset>>,
        to: impl Into<DateTime<FixedOffset>>,
    ) -> Result<Statistics> {
        self.request(Resource::statistics(from.into(), to.into())?, |body| {
            single(decode_statistics(body)?, body)
        })
    }

    /// Statistics over `from..to` partitioned into blocks of `block`.
    ///
    /// `block` is rounded down to whole hours and must be 1 to 24 hours. The
    /// server does the partitioning, so this is still a single request.
    pub fn statistics_in_blocks(
        &self,
        from: impl Into<DateTime<FixedOffset>>,
        to: impl Into<DateTime<FixedOffset>>,
        block: Duration,
    ) -> Result<Vec<Statistics>> {
        self.request(
            Resource::statistics_blocks(from.into(), to.into(), block)?,
            decode_statistics,
        )
    }

    fn request<R>(&self, resource: Resource, decode: impl FnOnce(&str) -> Result<R>) -> Result<R> {
        let url = urljoin(&self.url, &resource.path());
        let result = self.get(&url).and_then(|body| decode(&body));
        if let Err(Error::Api(err)) = &result {
            tracing::warn!(%url, code = %err.code, message = %err.message, "API reported an error");
        }
        result
    }

    fn get(&self, url: &str) -> Result<String> {
        tracing::debug!(%url, "GET");
        let reply = self.transport.get(url).map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;
        tracing::debug!(%url, status = reply.status, bytes = reply.body.len(), "response");

        if !reply.is_success() {
            // Error envelopes usually come with a 4xx; anything else is reported with its status.
            if let Some(err) = api_error(&reply.body) {
                return Err(Error::Api(err));
            }
            return Err(Error::malformed(
                format!("HTTP {} for url ({})", reply.status, url),
                &reply.body,
            ));
        }

        Ok(reply.body)
    }
}
