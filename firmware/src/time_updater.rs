//! # Time updater
//! Seeds the RTC from an HTTP time API once at startup.
//!
//! The device joins the wifi network, fetches the current unix time, converts it to local time
//! with the fixed offset from the configuration and sets the RTC. Every failure is retried after
//! a pause until the clock is set; the wifi is left again afterwards, the device does not need it
//! while running.
//!
//! # populate constants SSID and PASSWORD
//! `config/wifi_config.json`, turned into `wifi_secrets.rs` by build.rs:
//! ```json
//! {
//!     "ssid": "some_ssid_here",
//!     "password": "some_password_here"
//! }
//! ```
//!
//! # populate constant TIME_SERVER_URL
//! `config/time_api.json`, turned into `time_api_config.rs` by build.rs:
//! ```json
//! {
//!     "baseurl": "http://worldtimeapi.org/api",
//!     "path": "/timezone/Asia/Kolkata"
//! }
//! ```

include!(concat!(env!("OUT_DIR"), "/wifi_secrets.rs"));
include!(concat!(env!("OUT_DIR"), "/time_api_config.rs"));

use crate::display::OledSurface;
use crate::resources::{Irqs, WifiResources};
use crate::rtc_clock::RtcClock;
use cyw43::JoinOptions;
use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::{Debug2Format, error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_net::{
    Config, DhcpConfig, Stack, StackResources, dns,
    tcp::client::{TcpClient, TcpClientState},
};
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_rp::pio::Pio;
use embassy_time::{Duration, Timer, with_timeout};
use medibox::{CivilDateTime, Error, Placement, Result, TextSurface, time_api};
use rand::RngCore;
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::request::Method;
use static_cell::StaticCell;

/// Shown while joining the network
const CONNECTING_NOTICE: &str = "Connecting to wifi";
/// Shown once the network is up
const CONNECTED_NOTICE: &str = "Connected succesfully";

/// Wifi credentials, endpoint and retry timing of the startup clock sync
pub struct TimeUpdater {
    /// Network name
    ssid: &'static str,
    /// WPA2 passphrase
    password: &'static str,
    /// Endpoint answering with `unixtime`
    time_api_url: &'static str,
    /// Local time offset from UTC
    utc_offset_seconds: i32,
    /// Pause before the next attempt after a failure
    retry_after: Duration,
    /// Upper bound for the join and for DHCP
    timeout_duration: Duration,
}

impl TimeUpdater {
    /// Create a new `TimeUpdater` from the build-time configuration
    pub const fn new(utc_offset_seconds: i32) -> Self {
        Self {
            ssid: SSID,
            password: PASSWORD,
            time_api_url: TIME_SERVER_URL,
            utc_offset_seconds,
            retry_after: Duration::from_secs(30),
            timeout_duration: Duration::from_secs(10),
        }
    }

    /// Bring up wifi, set `clock` from the time API and leave the network again.
    ///
    /// Does not return before the clock has been set. Progress is shown on `surface`.
    pub async fn sync(
        &self,
        spawner: Spawner,
        r: WifiResources,
        surface: &mut OledSurface,
        clock: &mut RtcClock,
    ) {
        info!("init wifi");
        let fw = cyw43_firmware::CYW43_43439A0;
        let clm = cyw43_firmware::CYW43_43439A0_CLM;

        let pwr = Output::new(r.pwr_pin, Level::Low);
        let cs = Output::new(r.cs_pin, Level::High);
        let mut pio = Pio::new(r.pio_sm, Irqs);
        let spi = PioSpi::new(
            &mut pio.common,
            pio.sm0,
            DEFAULT_CLOCK_DIVIDER,
            pio.irq0,
            cs,
            r.dio_pin,
            r.clk_pin,
            r.dma_ch,
        );

        static STATE: StaticCell<cyw43::State> = StaticCell::new();
        let state = STATE.init(cyw43::State::new());
        let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
        unwrap!(spawner.spawn(wifi_task(runner)));

        control.init(clm).await;
        control
            .set_power_management(cyw43::PowerManagementMode::PowerSave)
            .await;

        let mut dhcp_config = DhcpConfig::default();
        dhcp_config.hostname = "medibox".try_into().ok();
        let config = Config::dhcpv4(dhcp_config);

        let seed = RoscRng.next_u64();

        static RESOURCES: StaticCell<StackResources<5>> = StaticCell::new();
        let (stack, net_runner) = embassy_net::new(
            net_device,
            config,
            RESOURCES.init(StackResources::<5>::new()),
            seed,
        );
        unwrap!(spawner.spawn(net_task(net_runner)));

        loop {
            show(surface, CONNECTING_NOTICE).await;
            info!("Joining network {}", self.ssid);
            match with_timeout(
                self.timeout_duration,
                control.join(self.ssid, JoinOptions::new(self.password.as_bytes())),
            )
            .await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("Error connecting to wifi: {}", Debug2Format(&e));
                    self.retry(&mut control).await;
                    continue;
                }
                Err(_) => {
                    error!("Timeout while trying to connect to wifi");
                    self.retry(&mut control).await;
                    continue;
                }
            }

            if with_timeout(self.timeout_duration, stack.wait_config_up())
                .await
                .is_err()
            {
                error!("DHCP timed out");
                self.retry(&mut control).await;
                continue;
            }
            info!("Connected to wifi");
            show(surface, CONNECTED_NOTICE).await;

            let synced = match self.fetch(stack, seed).await {
                Ok(local) => clock.seed(&local),
                Err(e) => Err(e),
            };
            match synced {
                Ok(()) => {
                    control.leave().await;
                    info!("Clock set, left wifi");
                    return;
                }
                Err(e) => {
                    warn!("Time sync failed: {}", e);
                    self.retry(&mut control).await;
                }
            }
        }
    }

    /// Ask the time API for the current time
    async fn fetch(&self, stack: Stack<'static>, seed: u64) -> Result<CivilDateTime> {
        let mut rx_buffer = [0; 8192];
        let mut tls_read_buffer = [0; 16640];
        let mut tls_write_buffer = [0; 16640];

        let client_state = TcpClientState::<1, 1024, 1024>::new();
        let tcp_client = TcpClient::new(stack, &client_state);
        let dns_client = dns::DnsSocket::new(stack);
        let tls_config = TlsConfig::new(
            seed,
            &mut tls_read_buffer,
            &mut tls_write_buffer,
            TlsVerify::None,
        );
        let mut http_client = HttpClient::new_with_tls(&tcp_client, &dns_client, tls_config);

        let mut request = http_client
            .request(Method::GET, self.time_api_url)
            .await
            .map_err(|e| {
                error!("Failed to make HTTP request: {}", Debug2Format(&e));
                Error::Network
            })?;
        let response = request.send(&mut rx_buffer).await.map_err(|e| {
            error!("Failed to send HTTP request: {}", Debug2Format(&e));
            Error::Network
        })?;
        let body = response.body().read_to_end().await.map_err(|e| {
            error!("Failed to read HTTP response: {}", Debug2Format(&e));
            Error::Network
        })?;

        time_api::parse_local_time(body, self.utc_offset_seconds)
    }

    /// Leave the network and wait before the next attempt
    async fn retry(&self, control: &mut cyw43::Control<'static>) {
        control.leave().await;
        info!("Retrying in {} s", self.retry_after.as_secs());
        Timer::after(self.retry_after).await;
    }
}

/// Show a status line, a failing display is not a reason to stop syncing
async fn show(surface: &mut OledSurface, text: &str) {
    if let Err(e) = surface.show(text, Placement::STATUS).await {
        warn!("Failed to show status: {}", e);
    }
}

/// Drives the CYW43 chip
#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// Drives the network stack
#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
