//! BLE remote-control adapter (Nordic UART Service).
//!
//! Carries the manual override commands from a phone into the
//! [`REMOTE_INBOX`] and pushes a compact status JSON back out.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid BLE GATT server via raw
//!   `esp_idf_svc::sys` calls.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID                                   | Perms        |
//! |----------------|----------------------------------------|--------------|
//! | Service        | `6E400001-B5A3-F393-E0A9-E50E24DCCA9E` |              |
//! | RX (commands)  | `6E400002-…`                           | Write        |
//! | TX (status)    | `6E400003-…`                           | Notify       |
//!
//! The RX write callback runs on the Bluedroid task.  It only copies the
//! bytes into the inbox; parsing happens on the control loop.

use core::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use log::{debug, info, warn};

use crate::app::events::{AppEvent, StatusReport};
use crate::app::ports::EventSink;
use crate::override_channel::{OverrideInbox, RawRemoteMessage, REMOTE_INBOX};

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const SERVICE_UUID: u128 = 0x6E400001_B5A3_F393_E0A9_E50E24DCCA9E;
pub const CHAR_RX: u128 = 0x6E400002_B5A3_F393_E0A9_E50E24DCCA9E;
pub const CHAR_TX: u128 = 0x6E400003_B5A3_F393_E0A9_E50E24DCCA9E;

/// Default ATT MTU payload; the status JSON must fit in one notification.
const MAX_STATUS_BYTES: usize = 64;

/// A central is connected.  Written from the GATTS callback.
static BLE_CONNECTED: AtomicBool = AtomicBool::new(false);

// ───────────────────────────────────────────────────────────────
// BLE state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    Idle,
    Advertising,
    Failed,
}

/// Copy one RX write into `inbox`.  Oversize writes are dropped here.
pub fn on_rx_write(inbox: &OverrideInbox, data: &[u8]) {
    match RawRemoteMessage::from_bytes(data) {
        Ok(msg) => inbox.post(msg),
        Err(e) => warn!("BLE: RX write dropped ({} bytes): {}", data.len(), e),
    }
}

// ── ESP-IDF BLE static state (callback-safe atomics) ──────────
//
// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures. These atomics bridge the callback context to the adapter.

#[cfg(target_os = "espidf")]
use core::sync::atomic::AtomicU32;

#[cfg(target_os = "espidf")]
static BLE_GATTS_IF: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CONN_ID: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_SVC_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_RX_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_TX_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CHAR_STEP: AtomicU32 = AtomicU32::new(0);

#[cfg(target_os = "espidf")]
fn uuid128_to_esp(uuid: u128) -> esp_idf_svc::sys::esp_bt_uuid_t {
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 16;
    unsafe {
        t.uuid.uuid128 = uuid.to_le_bytes();
    }
    t
}

#[cfg(target_os = "espidf")]
unsafe fn add_gatt_char(svc_handle: u16, uuid: u128, perm: u32, prop: u32) {
    use esp_idf_svc::sys::*;
    let mut char_uuid = uuid128_to_esp(uuid);
    unsafe {
        esp_ble_gatts_add_char(
            svc_handle,
            &mut char_uuid,
            perm as esp_gatt_perm_t,
            prop as esp_gatt_char_prop_t,
            core::ptr::null_mut(),
            core::ptr::null_mut(),
        );
    }
}

#[cfg(target_os = "espidf")]
unsafe fn start_advertising() {
    use esp_idf_svc::sys::*;
    unsafe {
        let mut adv_params = esp_ble_adv_params_t {
            adv_int_min: 0x20,
            adv_int_max: 0x40,
            adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
            own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
            channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
            adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
            ..core::mem::zeroed()
        };
        esp_ble_gap_start_advertising(&mut adv_params);
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    _param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_DATA_SET_COMPLETE_EVT => {
            unsafe { start_advertising() };
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising started");
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising stopped");
        }
        _ => {}
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gatts_event_handler(
    event: esp_idf_svc::sys::esp_gatts_cb_event_t,
    gatts_if: esp_idf_svc::sys::esp_gatt_if_t,
    param: *mut esp_idf_svc::sys::esp_ble_gatts_cb_param_t,
) {
    use esp_idf_svc::sys::*;

    BLE_GATTS_IF.store(gatts_if as u32, AtomicOrdering::Relaxed);

    match event {
        esp_gatts_cb_event_t_ESP_GATTS_REG_EVT => {
            log::info!("BLE GATTS: app registered (if={})", gatts_if);
            let mut svc_id = esp_gatt_srvc_id_t {
                id: esp_gatt_id_t {
                    uuid: uuid128_to_esp(SERVICE_UUID),
                    inst_id: 0,
                },
                is_primary: true,
            };
            // service + 2 × (decl + value) + TX CCCD
            unsafe { esp_ble_gatts_create_service(gatts_if, &mut svc_id, 8) };
        }
        esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
            let svc_handle = unsafe { (*param).create.service_handle };
            BLE_SVC_HANDLE.store(svc_handle as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: service created (handle={})", svc_handle);
            unsafe { esp_ble_gatts_start_service(svc_handle) };
            BLE_CHAR_STEP.store(1, AtomicOrdering::Relaxed);
            unsafe {
                add_gatt_char(
                    svc_handle,
                    CHAR_RX,
                    ESP_GATT_PERM_WRITE,
                    ESP_GATT_CHAR_PROP_BIT_WRITE | ESP_GATT_CHAR_PROP_BIT_WRITE_NR,
                );
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
            let handle = unsafe { (*param).add_char.attr_handle };
            let svc_handle = BLE_SVC_HANDLE.load(AtomicOrdering::Relaxed) as u16;
            match BLE_CHAR_STEP.load(AtomicOrdering::Relaxed) {
                1 => {
                    BLE_RX_CHAR_HANDLE.store(handle as u32, AtomicOrdering::Relaxed);
                    log::info!("BLE GATTS: RX char (handle={})", handle);
                    BLE_CHAR_STEP.store(2, AtomicOrdering::Relaxed);
                    unsafe {
                        add_gatt_char(svc_handle, CHAR_TX, ESP_GATT_PERM_READ, ESP_GATT_CHAR_PROP_BIT_NOTIFY);
                    }
                }
                2 => {
                    BLE_TX_CHAR_HANDLE.store(handle as u32, AtomicOrdering::Relaxed);
                    log::info!("BLE GATTS: TX char (handle={})", handle);
                    BLE_CHAR_STEP.store(3, AtomicOrdering::Relaxed);
                    // Client Characteristic Configuration descriptor (0x2902)
                    let mut cccd: esp_bt_uuid_t = unsafe { core::mem::zeroed() };
                    cccd.len = 2;
                    cccd.uuid.uuid16 = 0x2902;
                    unsafe {
                        esp_ble_gatts_add_char_descr(
                            svc_handle,
                            &mut cccd,
                            (ESP_GATT_PERM_READ | ESP_GATT_PERM_WRITE) as esp_gatt_perm_t,
                            core::ptr::null_mut(),
                            core::ptr::null_mut(),
                        );
                    }
                }
                _ => {}
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_DESCR_EVT => {
            log::info!("BLE GATTS: TX CCCD registered, service ready");
        }
        esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
            let conn_id = unsafe { (*param).connect.conn_id };
            BLE_CONN_ID.store(conn_id as u32, AtomicOrdering::Relaxed);
            BLE_CONNECTED.store(true, AtomicOrdering::Release);
            log::info!("BLE GATTS: client connected (conn_id={})", conn_id);
        }
        esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
            BLE_CONNECTED.store(false, AtomicOrdering::Release);
            BLE_CONN_ID.store(0, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: client disconnected, advertising again");
            unsafe { start_advertising() };
        }
        esp_gatts_cb_event_t_ESP_GATTS_WRITE_EVT => {
            let p = unsafe { &(*param).write };
            if p.handle as u32 == BLE_RX_CHAR_HANDLE.load(AtomicOrdering::Relaxed) {
                let data = unsafe { core::slice::from_raw_parts(p.value, p.len as usize) };
                on_rx_write(&REMOTE_INBOX, data);
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// BLE adapter
// ───────────────────────────────────────────────────────────────

pub struct BleRemoteLink {
    state: BleState,
    device_name: heapless::String<24>,
    last_status: heapless::Vec<u8, MAX_STATUS_BYTES>,
}

impl BleRemoteLink {
    pub fn new(device_name: heapless::String<24>) -> Self {
        Self {
            state: BleState::Idle,
            device_name,
            last_status: heapless::Vec::new(),
        }
    }

    pub fn state(&self) -> BleState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        BLE_CONNECTED.load(AtomicOrdering::Acquire)
    }

    pub fn start(&mut self) {
        info!("BLE: starting advertising as '{}'", self.device_name);
        self.state = if self.platform_start() {
            BleState::Advertising
        } else {
            BleState::Failed
        };
    }

    /// Last status payload pushed (or attempted) over TX.
    pub fn last_status(&self) -> &[u8] {
        &self.last_status
    }

    /// Serialise and notify `report` if a central is listening.
    pub fn notify_status(&mut self, report: &StatusReport) {
        let json = match report.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("BLE: status serialisation failed: {}", e);
                return;
            }
        };
        self.last_status.clear();
        if self.last_status.extend_from_slice(&json).is_err() {
            warn!("BLE: status payload too long ({} > {})", json.len(), MAX_STATUS_BYTES);
            return;
        }
        if self.is_connected() {
            self.platform_notify(&json);
        } else {
            debug!("BLE: no central, status not sent");
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> bool {
        use esp_idf_svc::sys::*;
        unsafe {
            // Release classic BT memory (BLE-only mode saves ~30 KB).
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            let ret = esp_bt_controller_init(&mut bt_cfg);
            if ret != ESP_OK as i32 {
                log::error!("BLE: bt_controller_init failed ({})", ret);
                return false;
            }
            let ret = esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE);
            if ret != ESP_OK as i32 {
                log::error!("BLE: bt_controller_enable failed ({})", ret);
                return false;
            }
            let ret = esp_bluedroid_init();
            if ret != ESP_OK as i32 {
                log::error!("BLE: bluedroid_init failed ({})", ret);
                return false;
            }
            let ret = esp_bluedroid_enable();
            if ret != ESP_OK as i32 {
                log::error!("BLE: bluedroid_enable failed ({})", ret);
                return false;
            }

            esp_ble_gap_register_callback(Some(ble_gap_event_handler));
            esp_ble_gatts_register_callback(Some(ble_gatts_event_handler));
            esp_ble_gatts_app_register(0);

            // NUL-terminated copy of the advertised name.
            let mut name = [0u8; 25];
            let bytes = self.device_name.as_bytes();
            name[..bytes.len()].copy_from_slice(bytes);
            esp_ble_gap_set_device_name(name.as_ptr() as *const _);

            // Advertising starts once the payload is accepted (GAP callback).
            let mut adv_data = esp_ble_adv_data_t {
                set_scan_rsp: false,
                include_name: true,
                include_txpower: false,
                min_interval: 0x0006,
                max_interval: 0x0010,
                flag: (ESP_BLE_ADV_FLAG_GEN_DISC | ESP_BLE_ADV_FLAG_BREDR_NOT_SPT) as u8,
                ..core::mem::zeroed()
            };
            let ret = esp_ble_gap_config_adv_data(&mut adv_data);
            if ret != ESP_OK as i32 {
                log::error!("BLE: config_adv_data failed ({})", ret);
                return false;
            }
        }
        info!("BLE(espidf): Bluedroid up, NUS service registered");
        true
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> bool {
        info!(
            "BLE(sim): advertising '{}' (service {:032x})",
            self.device_name, SERVICE_UUID
        );
        true
    }

    #[cfg(target_os = "espidf")]
    fn platform_notify(&mut self, payload: &[u8]) {
        use esp_idf_svc::sys::*;
        let handle = BLE_TX_CHAR_HANDLE.load(AtomicOrdering::Relaxed);
        if handle == 0 {
            return;
        }
        unsafe {
            esp_ble_gatts_send_indicate(
                BLE_GATTS_IF.load(AtomicOrdering::Relaxed) as u8,
                BLE_CONN_ID.load(AtomicOrdering::Relaxed) as u16,
                handle as u16,
                payload.len() as u16,
                payload.as_ptr() as *mut u8,
                false,
            );
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_notify(&mut self, payload: &[u8]) {
        debug!("BLE(sim): notify {}", String::from_utf8_lossy(payload));
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Simulate a central writing to the RX characteristic.
    #[cfg(not(target_os = "espidf"))]
    pub fn simulate_write(&self, data: &[u8]) {
        on_rx_write(&REMOTE_INBOX, data);
    }

    /// Simulate a central connecting or disconnecting.
    #[cfg(not(target_os = "espidf"))]
    pub fn simulate_connection(&self, connected: bool) {
        BLE_CONNECTED.store(connected, AtomicOrdering::Release);
    }
}

impl EventSink for BleRemoteLink {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::Status(report) = event {
            self.notify_status(report);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
