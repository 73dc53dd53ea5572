//! # Network task
//! This module contains the task that keeps the clock connected.
//! The task joins the wifi network, syncs the clock from a time API every few hours and listens
//! on a UDP port for alarm messages, which it posts into the alarm mailbox unchanged.
//!
//! # populate constants SSID and PASSWORD
//! make sure to have a wifi_config.json file in the config folder formatted as follows:
//!```json
//!  {
//!     "ssid": "some_ssid_here",
//!     "password": "some_password_here"
//! }
//! ```
//!
//! # populate constant TIME_SERVER_URL
//! make sure to have a time_api.json file in the config folder formatted as follows:
//! ```json
//! {
//!     "time api by zone": {
//!         "baseurl": "http://worldtimeapi.org/api",
//!         "timezone": "/timezone/Europe/Berlin"
//!     }
//! }
//! ```
//!
//! # populate constant ALARM_LISTEN_PORT
//! optionally have an alarm_config.json file in the config folder, the port defaults to 4242:
//! ```json
//! {
//!     "listen_port": 4242
//! }
//! ```

include!(concat!(env!("OUT_DIR"), "/wifi_secrets.rs"));
include!(concat!(env!("OUT_DIR"), "/time_api_config.rs"));
include!(concat!(env!("OUT_DIR"), "/alarm_config.rs"));

use cyw43::JoinOptions;
use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::{Debug2Format, error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{
    Config, DhcpConfig, Stack, StackResources, dns,
    tcp::client::{TcpClient, TcpClientState},
};
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_rp::pio::Pio;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Timer, with_timeout};
use pico_remote_alarmclock::{SyncedClock, parse_time_api_response};
use rand::RngCore;
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::request::Method;
use static_cell::StaticCell;

use crate::task::alarm_clock::ALARM_MAILBOX;
use crate::task::resources::{Irqs, WifiResources};

/// The wall clock, synced by this task and read by the alarm clock loop
pub static CLOCK_MUTEX: Mutex<CriticalSectionRawMutex, SyncedClock> =
    Mutex::new(SyncedClock::new());

/// Connection settings of the network task
pub struct NetworkManager {
    /// Wifi SSID
    ssid: &'static str,
    /// Wifi password
    password: &'static str,
    /// URL of the time API for our timezone
    time_api_url: &'static str,
    /// UDP port alarm messages arrive on
    listen_port: u16,
    /// Time between two clock syncs
    refresh_after_secs: u64,
    /// Time before retrying a failed step
    retry_after_secs: u64,
    /// Timeout for joining the network
    timeout_duration: Duration,
}

impl NetworkManager {
    /// Create a new `NetworkManager` from the generated configuration
    pub const fn new() -> Self {
        Self {
            ssid: SSID,
            password: PASSWORD,
            time_api_url: TIME_SERVER_URL,
            listen_port: ALARM_LISTEN_PORT,
            refresh_after_secs: 21_600, // 6 hours
            retry_after_secs: 30,
            timeout_duration: Duration::from_secs(10),
        }
    }

    /// Wait before retrying a failed step
    async fn wait_for_retry(&self) {
        Timer::after(Duration::from_secs(self.retry_after_secs)).await;
    }
}

#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Receive alarm messages forever and hand every datagram to the alarm clock loop
#[embassy_executor::task]
async fn udp_listener(stack: Stack<'static>, port: u16, retry_after_secs: u64) -> ! {
    let mut rx_meta = [PacketMetadata::EMPTY; 4];
    let mut rx_buffer = [0; 512];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0; 64];

    loop {
        stack.wait_config_up().await;

        let mut socket = UdpSocket::new(
            stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        if let Err(e) = socket.bind(port) {
            error!(
                "Failed to bind UDP port {}, retrying in {} seconds: {:?}",
                port,
                retry_after_secs,
                Debug2Format(&e)
            );
            Timer::after(Duration::from_secs(retry_after_secs)).await;
            continue;
        }
        info!("Listening for alarm messages on UDP port {}", port);

        // the whole datagram is handed to the mailbox, which keeps its first bytes
        loop {
            socket
                .recv_from_with(|datagram, meta| {
                    info!(
                        "Alarm message of {} bytes from {:?}",
                        datagram.len(),
                        Debug2Format(&meta.endpoint)
                    );
                    ALARM_MAILBOX.post(datagram);
                })
                .await;
        }
    }
}

/// Fetch the time API once and sync the clock
async fn sync_clock(
    stack: Stack<'static>,
    seed: u64,
    network_manager: &NetworkManager,
) -> Result<(), ()> {
    // create buffers for the request and response
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
        .request(Method::GET, network_manager.time_api_url)
        .await
        .map_err(|e| error!("Failed to make HTTP request: {:?}", Debug2Format(&e)))?;

    let response = request
        .send(&mut rx_buffer)
        .await
        .map_err(|e| error!("Failed to send HTTP request: {:?}", Debug2Format(&e)))?;

    let body = response
        .body()
        .read_to_end()
        .await
        .map_err(|e| error!("Failed to read response body: {:?}", Debug2Format(&e)))?;

    let reading = parse_time_api_response(body)
        .map_err(|e| error!("Failed to parse response body: {}", e))?;

    CLOCK_MUTEX
        .lock()
        .await
        .sync(reading, Instant::now().as_secs())
        .map_err(|e| error!("Clock rejected the reading: {}", e))
}

/// Join the wifi network, retrying until it works and DHCP is up
async fn join(
    control: &mut cyw43::Control<'static>,
    stack: Stack<'static>,
    network_manager: &NetworkManager,
) {
    loop {
        info!("Joining WPA2 network with SSID: {:?}", network_manager.ssid);
        let join_result = with_timeout(
            network_manager.timeout_duration,
            control.join(
                network_manager.ssid,
                JoinOptions::new(network_manager.password.as_bytes()),
            ),
        )
        .await;
        match join_result {
            Ok(Ok(())) => {
                control.gpio_set(0, true).await; // onboard LED on
                info!("Connected to wifi");
            }
            Ok(Err(e)) => {
                error!("Error connecting to wifi: {}", Debug2Format(&e));
                network_manager.wait_for_retry().await;
                continue;
            }
            Err(_) => {
                error!("Timeout while trying to connect to wifi");
                network_manager.wait_for_retry().await;
                continue;
            }
        }

        if with_timeout(Duration::from_secs(10), stack.wait_config_up())
            .await
            .is_ok()
        {
            info!("DHCP is up");
            return;
        }

        error!(
            "Waiting for DHCP timed out. Retrying in {:?} seconds",
            network_manager.retry_after_secs
        );
        control.leave().await;
        control.gpio_set(0, false).await; // onboard LED off
        network_manager.wait_for_retry().await;
    }
}

#[embassy_executor::task]
pub async fn network(spawner: Spawner, r: WifiResources) {
    info!("Network task started");

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

    let network_manager = NetworkManager::new();

    // the wifi firmware and CLM blobs are flashed separately to these addresses
    let fw = unsafe { core::slice::from_raw_parts(0x1010_0000 as *const u8, 230_321) };
    let clm = unsafe { core::slice::from_raw_parts(0x1014_0000 as *const u8, 4752) };

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    unwrap!(spawner.spawn(wifi_task(runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname = "alarmclck".try_into().ok();
    let config = Config::dhcpv4(dhcp_config);

    let mut rng = RoscRng;
    let seed = rng.next_u64();

    static RESOURCES: StaticCell<StackResources<5>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        config,
        RESOURCES.init(StackResources::new()),
        seed,
    );
    unwrap!(spawner.spawn(net_task(runner)));

    join(&mut control, stack, &network_manager).await;
    unwrap!(spawner.spawn(udp_listener(
        stack,
        network_manager.listen_port,
        network_manager.retry_after_secs
    )));

    loop {
        if !stack.is_link_up() {
            warn!("Wifi link lost, joining again");
            control.gpio_set(0, false).await; // onboard LED off
            join(&mut control, stack, &network_manager).await;
        }

        if sync_clock(stack, seed, &network_manager).await.is_err() {
            info!(
                "Clock sync failed, retrying in {:?} seconds",
                network_manager.retry_after_secs
            );
            network_manager.wait_for_retry().await;
            continue;
        }

        info!(
            "Clock synced, next sync in {:?} seconds",
            network_manager.refresh_after_secs
        );
        Timer::after(Duration::from_secs(network_manager.refresh_after_secs)).await;
    }
}
