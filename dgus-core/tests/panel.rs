//! Full panel loop against in-memory UARTs and EEPROM

use std::collections::VecDeque;

use dgus_core::screens::menu;
use dgus_core::{HostRequest, Panel, PanelConfig, Pid, PrinterStatus, TemperatureKind, VersionInfo};
use dgus_hal::{ArrayEeprom, Crc16, SetBaudrate, UartRx, UartTx};
use dgus_protocol::{Action, Command, Frame, KeyValue, Page, Register};

#[derive(Default)]
struct MockTx {
    bytes: Vec<u8>,
}

impl UartTx for MockTx {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

#[derive(Default)]
struct MockRx {
    bytes: VecDeque<u8>,
}

impl UartRx for MockRx {
    type Error = ();

    fn available(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf.len().min(self.bytes.len());
        for (slot, byte) in buf.iter_mut().zip(self.bytes.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

#[derive(Default)]
struct MockUsb {
    bytes: Vec<u8>,
    baudrate: u32,
}

impl UartTx for MockUsb {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

impl SetBaudrate for MockUsb {
    type Error = ();

    fn set_baudrate(&mut self, baudrate: u32) -> Result<(), ()> {
        self.baudrate = baudrate;
        Ok(())
    }
}

const VERSIONS: VersionInfo = VersionInfo {
    firmware: "5.0.0",
    build: "test",
    marlin: "1.1.9",
};

type TestPanel = Panel<MockTx, MockRx>;

fn panel() -> TestPanel {
    let mut panel = Panel::new(
        MockTx::default(),
        MockRx::default(),
        PanelConfig::default(),
        VERSIONS,
    );
    panel.setup(0);
    panel
}

fn booted() -> TestPanel {
    let mut panel = panel();
    panel.idle(0, &PrinterStatus::default());
    panel.tx_mut().bytes.clear();
    panel
}

/// Key frame as the panel sends it
fn press(panel: &mut TestPanel, action: Action, key: KeyValue) {
    let [a_high, a_low] = action.address().to_be_bytes();
    let [k_high, k_low] = key.value().to_be_bytes();
    panel
        .rx_mut()
        .bytes
        .extend([0x5A, 0xA5, 0x06, 0x83, a_high, a_low, 0x01, k_high, k_low]);
}

/// Split the bytes written to the panel into frames
fn frames(bytes: &[u8]) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut rest = bytes;
    while rest.len() >= 3 {
        let end = 3 + rest[2] as usize;
        frames.push(Frame::decode(&rest[..end]).unwrap());
        rest = &rest[end..];
    }
    assert!(rest.is_empty());
    frames
}

fn register_writes(bytes: &[u8], register: Register) -> Vec<Vec<u8>> {
    frames(bytes)
        .into_iter()
        .filter(|f| f.command == Command::WriteRegister && f.payload[0] == register.address())
        .map(|f| f.payload[1..].to_vec())
        .collect()
}

fn drain(panel: &mut TestPanel) -> Vec<HostRequest> {
    std::iter::from_fn(|| panel.pop_request()).collect()
}

#[test]
fn test_boot_shows_boot_page_and_versions() {
    let mut panel = panel();
    panel.idle(0, &PrinterStatus::default());

    assert_eq!(panel.current_page(), Page::Boot);
    let bytes = &panel.tx().bytes;
    assert!(register_writes(bytes, Register::PictureId).contains(&vec![0x00, Page::Boot.id()]));
    assert_eq!(register_writes(bytes, Register::Brightness), vec![vec![0x40]]);

    let version = frames(bytes)
        .into_iter()
        .find(|f| f.command == Command::WriteVariable && f.payload[..2] == [0x02, 0x00])
        .unwrap();
    assert_eq!(&version.payload[3..8], b"5.0.0");
    assert_eq!(panel.context().state.texts.message().trim_end(), "Ready");
}

#[test]
fn test_menu_key_changes_page() {
    let mut panel = booted();
    press(&mut panel, Action::Screens, KeyValue::new(menu::CONTROLS));
    panel.idle(10, &PrinterStatus::default());

    assert_eq!(panel.current_page(), Page::Controls);
    assert_eq!(
        register_writes(&panel.tx().bytes, Register::PictureId),
        vec![vec![0x00, Page::Controls.id()]]
    );

    press(&mut panel, Action::Screens, KeyValue::BACK);
    panel.idle(20, &PrinterStatus::default());
    assert_eq!(panel.current_page(), Page::Boot);
}

#[test]
fn test_one_frame_per_iteration() {
    let mut panel = booted();
    press(&mut panel, Action::Preheat, KeyValue::SHOW);
    press(&mut panel, Action::Preheat, KeyValue::SAVE);

    panel.idle(10, &PrinterStatus::default());
    assert_eq!(panel.current_page(), Page::Preheat);
    assert!(drain(&mut panel).is_empty());

    panel.idle(20, &PrinterStatus::default());
    assert_eq!(panel.current_page(), Page::Boot);
    assert_eq!(
        drain(&mut panel),
        vec![
            HostRequest::SetTemperature {
                kind: TemperatureKind::Hotend1,
                value: 180
            },
            HostRequest::SetTemperature {
                kind: TemperatureKind::Bed,
                value: 50
            },
            HostRequest::SetFan { percent: 100 },
        ]
    );
}

#[test]
fn test_garbage_is_dropped() {
    let mut panel = booted();
    panel.rx_mut().bytes.extend([0x00, 0x01, 0x02]);
    panel.idle(10, &PrinterStatus::default());
    assert_eq!(panel.current_page(), Page::Boot);

    // The receiver resynchronizes on the next frame
    panel.rx_mut().bytes.clear();
    press(&mut panel, Action::Screens, KeyValue::new(menu::SETTINGS));
    panel.idle(20, &PrinterStatus::default());
    assert_eq!(panel.current_page(), Page::Settings);
}

#[test]
fn test_settings_survive_restart() {
    let mut eeprom = ArrayEeprom::<512>::new();

    let mut first = booted();
    let usb = &mut MockUsb::default();
    first.change_usb_baudrate(usb, 115_200, false);
    first.add_pid(TemperatureKind::Hotend1, Pid::new(10.0, 1.0, 50.0, 240));
    first.store_settings(&mut eeprom, 100).unwrap();

    let mut second = panel();
    assert!(second.load_settings(&mut eeprom, 100).unwrap());
    assert_eq!(second.usb_baudrate(), 115_200);

    second.idle(0, &PrinterStatus::default());
    assert_eq!(second.current_page(), Page::Boot);

    // Heating to 235 picks the set tuned at 240
    second.notify_target_temperature(TemperatureKind::Hotend1, 235);
    assert_eq!(
        drain(&mut second),
        vec![HostRequest::ApplyPid {
            kind: TemperatureKind::Hotend1,
            pid: Pid::new(10.0, 1.0, 50.0, 240)
        }]
    );
}

#[test]
fn test_host_cursor_settings() {
    let mut eeprom = ArrayEeprom::<512>::new();
    let first = booted();

    let mut pos = 8;
    let mut crc = Crc16::new();
    first.write_settings(&mut eeprom, &mut pos, &mut crc).unwrap();
    assert_eq!(pos, 8 + first.settings_size());
    let written = crc.value();

    let mut second = panel();
    let mut pos = 8;
    let mut crc = Crc16::new();
    assert!(second.read_settings(&mut eeprom, &mut pos, &mut crc).unwrap());
    assert_eq!(crc.value(), written);
}

#[test]
fn test_host_cursor_skips_block_of_other_version() {
    let mut eeprom = ArrayEeprom::<512>::new();
    let first = booted();
    let mut pos = 0;
    first
        .write_settings(&mut eeprom, &mut pos, &mut Crc16::new())
        .unwrap();
    eeprom.as_mut_bytes()[0] ^= 0x01;

    let mut second = panel();
    let mut pos = 0;
    let ok = second
        .read_settings(&mut eeprom, &mut pos, &mut Crc16::new())
        .unwrap();
    assert!(!ok);
    assert_eq!(pos, second.settings_size());

    second.idle(0, &PrinterStatus::default());
    assert_eq!(second.current_page(), Page::EepromMismatch);
}

#[test]
fn test_rejected_settings_show_mismatch_page() {
    let mut eeprom = ArrayEeprom::<512>::new();
    let mut panel = panel();
    assert!(!panel.load_settings(&mut eeprom, 0).unwrap());

    panel.idle(0, &PrinterStatus::default());
    assert_eq!(panel.current_page(), Page::EepromMismatch);

    press(&mut panel, Action::EepromMismatch, KeyValue::new(1));
    panel.idle(10, &PrinterStatus::default());
    assert_eq!(panel.current_page(), Page::Main);
    assert_eq!(drain(&mut panel), vec![HostRequest::SaveSettings]);
}

#[test]
fn test_dims_after_inactivity_and_wakes_on_key() {
    let config = PanelConfig::default();
    let mut panel = booted();

    panel.idle(config.dimming.delay_ms, &PrinterStatus::default());
    assert!(panel.context().dimming.is_dimmed());
    assert_eq!(
        register_writes(&panel.tx().bytes, Register::Brightness),
        vec![vec![0x03]]
    );

    panel.tx_mut().bytes.clear();
    press(&mut panel, Action::Screens, KeyValue::new(menu::INFOS));
    panel.idle(config.dimming.delay_ms + 50, &PrinterStatus::default());
    assert!(!panel.context().dimming.is_dimmed());
    assert_eq!(
        register_writes(&panel.tx().bytes, Register::Brightness),
        vec![vec![0x40]]
    );
}

#[test]
fn test_touch_flag_counts_as_activity() {
    let config = PanelConfig::default();
    let mut panel = booted();

    // Touch flag answer: register 0x05, one byte, 0x5A
    panel.rx_mut().bytes.extend([0x5A, 0xA5, 0x04, 0x81, 0x05, 0x01, 0x5A]);
    panel.idle(config.dimming.delay_ms - 100, &PrinterStatus::default());
    assert_eq!(
        register_writes(&panel.tx().bytes, Register::TouchPanelFlag),
        vec![vec![0x00]]
    );

    panel.idle(config.dimming.delay_ms, &PrinterStatus::default());
    assert!(!panel.context().dimming.is_dimmed());
}

#[test]
fn test_temperature_error() {
    let mut panel = booted();
    panel.report_temperature_error("Thermal runaway");
    assert_eq!(panel.current_page(), Page::ThermalRunawayError);
    assert_eq!(panel.context().state.texts.message().trim_end(), "Thermal runaway");
    assert!(!panel.tx().bytes.is_empty());
}

#[test]
fn test_host_commands() {
    let mut panel = booted();
    panel.report_command(0);
    panel.report_command(1);
    panel.report_command(7);
    assert_eq!(drain(&mut panel), vec![HostRequest::PauseResume, HostRequest::Stop]);
    assert_eq!(panel.current_page(), Page::Main);
}

#[test]
fn test_wait_for_user() {
    let mut panel = booted();
    panel.wait_for_user("Insert filament");
    panel.idle(10, &PrinterStatus::default());
    assert_eq!(panel.current_page(), Page::WaitContinue);

    press(&mut panel, Action::Wait, KeyValue::new(1));
    panel.idle(20, &PrinterStatus::default());
    assert_eq!(drain(&mut panel), vec![HostRequest::Continue]);
    assert_eq!(panel.current_page(), Page::Boot);
}

#[test]
fn test_change_usb_baudrate() {
    let mut panel = booted();
    let mut usb = MockUsb::default();
    panel.change_usb_baudrate(&mut usb, 115_200, true);

    assert_eq!(usb.baudrate, 115_200);
    assert!(usb.bytes.starts_with(b"//action:disconnect\n"));
    assert!(usb.bytes.ends_with(b"\nstart\n"));
    assert_eq!(panel.usb_baudrate(), 115_200);
}

#[test]
fn test_target_temperature_zero_is_ignored() {
    let mut panel = booted();
    panel.notify_target_temperature(TemperatureKind::Bed, 0);
    assert!(drain(&mut panel).is_empty());
    assert_eq!(
        panel.context().state.last_used_temperature(TemperatureKind::Bed),
        60
    );
}
