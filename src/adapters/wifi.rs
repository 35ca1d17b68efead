//! Wi-Fi adapter.
//!
//! Implements [`NetworkPort`] and owns the boot-time connection policy:
//!
//! 1. Stored credentials present → join as a station, applying the stored
//!    hostname before DHCP runs.
//! 2. No credentials, or the join fails → open the configuration access
//!    point ([`BoardConfig::ap_ssid`](crate::config::BoardConfig::ap_ssid), open auth).
//! 3. Access point cannot start either → [`ConnectivityError`]; `main`
//!    restarts the device.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `BlockingWifi<EspWifi>` from `esp_idf_svc`.
//! - **all other targets**: simulation for host runs and tests.

use core::fmt;
use core::net::Ipv4Addr;

use log::{info, warn};

use crate::app::ports::{Hostname, NetworkError, NetworkPort, Ssid};
use crate::board::ServeMode;
use crate::settings::WifiCredentials;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    /// Neither station nor access point could be brought up.
    NoInterface,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInterface => write!(f, "neither station nor access point came up"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

/// Hostname the interface reports until one is set.
const DEFAULT_HOSTNAME: &str = "espressif";

#[cfg(not(target_os = "espidf"))]
const SIM_STA_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 50);
#[cfg(not(target_os = "espidf"))]
const SIM_AP_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    mode: Option<ServeMode>,
    ssid: Ssid,
    hostname: Hostname,
    #[cfg(not(target_os = "espidf"))]
    sim_join_fails: bool,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self {
            wifi,
            mode: None,
            ssid: Ssid::new(),
            hostname: Hostname::try_from(DEFAULT_HOSTNAME).unwrap_or_default(),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            mode: None,
            ssid: Ssid::new(),
            hostname: Hostname::try_from(DEFAULT_HOSTNAME).unwrap_or_default(),
            sim_join_fails: false,
        }
    }

    /// Simulation: make the next station join fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn fail_station_join(&mut self) {
        self.sim_join_fails = true;
    }

    /// Interface mode after [`auto_connect`](Self::auto_connect), `None` before.
    pub fn mode(&self) -> Option<ServeMode> {
        self.mode
    }

    /// Bring the network up following the boot policy above.
    pub fn auto_connect(
        &mut self,
        creds: Option<&WifiCredentials>,
        hostname: Option<&str>,
        ap_ssid: &str,
    ) -> Result<ServeMode, ConnectivityError> {
        if let Some(creds) = creds {
            if let Some(name) = hostname {
                if let Err(e) = self.set_hostname(name) {
                    warn!("WiFi: stored hostname not applied: {}", e);
                }
            }
            info!("WiFi: joining '{}'", creds.ssid);
            match self.platform_join(creds) {
                Ok(()) => {
                    self.ssid = creds.ssid.clone();
                    self.mode = Some(ServeMode::Station);
                    info!("WiFi: station up, ip={}", self.ip_address());
                    return Ok(ServeMode::Station);
                }
                Err(e) => warn!("WiFi: join '{}' failed: {}", creds.ssid, e),
            }
        } else {
            info!("WiFi: no stored credentials");
        }

        info!("WiFi: opening configuration AP '{}'", ap_ssid);
        match self.platform_access_point(ap_ssid) {
            Ok(()) => {
                self.ssid = Ssid::try_from(ap_ssid).unwrap_or_default();
                self.mode = Some(ServeMode::Portal);
                info!("WiFi: access point up, ip={}", self.ip_address());
                Ok(ServeMode::Portal)
            }
            Err(e) => {
                warn!("WiFi: access point failed: {}", e);
                Err(ConnectivityError::NoInterface)
            }
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_join(&mut self, creds: &WifiCredentials) -> Result<(), esp_idf_svc::sys::EspError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if creds.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        // Both strings were length-checked when the credentials were built.
        let config = Configuration::Client(ClientConfiguration {
            ssid: creds.ssid.as_str().try_into().unwrap_or_default(),
            password: creds.password.as_str().try_into().unwrap_or_default(),
            auth_method,
            ..Default::default()
        });
        self.wifi.set_configuration(&config)?;
        if !self.wifi.is_started()? {
            self.wifi.start()?;
        }
        let joined = self.wifi.connect().and_then(|()| self.wifi.wait_netif_up());
        if joined.is_err() {
            let _ = self.wifi.stop();
        }
        joined
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_join(&mut self, _creds: &WifiCredentials) -> Result<(), &'static str> {
        if core::mem::take(&mut self.sim_join_fails) {
            return Err("simulated join failure");
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_access_point(&mut self, ap_ssid: &str) -> Result<(), esp_idf_svc::sys::EspError> {
        use esp_idf_svc::wifi::{AccessPointConfiguration, AuthMethod, Configuration};

        let config = Configuration::AccessPoint(AccessPointConfiguration {
            ssid: ap_ssid.try_into().unwrap_or_default(),
            auth_method: AuthMethod::None,
            channel: 1,
            ..Default::default()
        });
        self.wifi.set_configuration(&config)?;
        self.wifi.start()?;
        self.wifi.wait_netif_up()
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_access_point(&mut self, ap_ssid: &str) -> Result<(), &'static str> {
        if ap_ssid.is_empty() {
            return Err("empty AP SSID");
        }
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkPort for WifiAdapter {
    fn ssid(&self) -> Ssid {
        self.ssid.clone()
    }

    fn ip_address(&self) -> Ipv4Addr {
        #[cfg(target_os = "espidf")]
        {
            let info = match self.mode {
                Some(ServeMode::Station) => self.wifi.wifi().sta_netif().get_ip_info(),
                Some(ServeMode::Portal) => self.wifi.wifi().ap_netif().get_ip_info(),
                None => return Ipv4Addr::UNSPECIFIED,
            };
            info.map(|i| Ipv4Addr::from(i.ip.octets()))
                .unwrap_or(Ipv4Addr::UNSPECIFIED)
        }

        #[cfg(not(target_os = "espidf"))]
        match self.mode {
            Some(ServeMode::Station) => SIM_STA_IP,
            Some(ServeMode::Portal) => SIM_AP_IP,
            None => Ipv4Addr::UNSPECIFIED,
        }
    }

    fn hostname(&self) -> Hostname {
        self.hostname.clone()
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), NetworkError> {
        let name = Hostname::try_from(hostname).map_err(|()| NetworkError::HostnameRejected)?;

        #[cfg(target_os = "espidf")]
        self.wifi
            .wifi_mut()
            .sta_netif_mut()
            .set_hostname(hostname)
            .map_err(|e| {
                warn!("WiFi: set_hostname('{}') failed: {}", hostname, e);
                NetworkError::HostnameRejected
            })?;

        self.hostname = name;
        info!("WiFi: hostname set to '{}' (next DHCP lease)", self.hostname);
        Ok(())
    }
}
