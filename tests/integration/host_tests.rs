//! Host role: commands out, events and ACL data in.

use bthci::hci::HciTl;
use bthci::hci::consts::{PacketType, evt, op, status};
use bthci::hci::msg::{Dest, MsgKind};
use bthci::{Error, Fault, HciConfig};

use crate::mock_io::MockIo;

fn setup() -> (HciTl, MockIo) {
    let config = HciConfig::default();
    let io = MockIo::new(&config);
    (HciTl::new(config).unwrap(), io)
}

#[test]
fn command_complete_routed_by_returned_handle() {
    let (mut tl, mut io) = setup();
    let idx = io.links.host_connect(0x0002).unwrap();

    tl.send_command(op::RD_RSSI, &[0x02, 0x00], Some(idx), &mut io).unwrap();
    assert_eq!(io.written[0], (PacketType::Command, vec![0x05, 0x14, 2, 0x02, 0x00]));

    tl.event_received(evt::CMD_CMP, &[1, 0x05, 0x14, status::SUCCESS, 0x02, 0x00, 0xC8], &mut io)
        .unwrap();
    let msg = &io.delivered[0];
    assert_eq!(msg.kind, MsgKind::CmdCmpEvt);
    assert_eq!(msg.id, op::RD_RSSI);
    assert_eq!(msg.dest, Dest::Gapc(idx));
    assert_eq!(&msg.params()[2..4], &[0x02, 0x00]);
}

#[test]
fn command_status_returns_to_issuing_connection() {
    let (mut tl, mut io) = setup();
    io.links.host_connect(0x0001).unwrap();
    let idx = io.links.host_connect(0x0005).unwrap();

    tl.send_command(op::DISCONNECT, &[0x05, 0x00, 0x13], Some(idx), &mut io).unwrap();
    tl.event_received(evt::CMD_STATUS, &[status::SUCCESS, 1, 0x06, 0x04], &mut io).unwrap();
    assert_eq!(io.delivered[0].kind, MsgKind::CmdStatEvt);
    assert_eq!(io.delivered[0].dest, Dest::Gapc(idx));

    // Malformed status event: dropped.
    tl.event_received(evt::CMD_STATUS, &[status::SUCCESS, 1, 0x06], &mut io).unwrap();
    assert_eq!(io.delivered.len(), 1);
}

#[test]
fn management_events_reach_gap_manager() {
    let (mut tl, mut io) = setup();
    tl.event_received(evt::CMD_CMP, &[1, 0x03, 0x0C, status::SUCCESS], &mut io).unwrap();
    tl.event_received(evt::HW_ERR, &[0x04], &mut io).unwrap();
    assert!(io.delivered.iter().all(|m| m.dest == Dest::Gapm));
    assert_eq!(io.delivered.len(), 2);
}

#[test]
fn unknown_host_command_is_a_fault() {
    let (mut tl, mut io) = setup();
    assert_eq!(
        tl.send_command(0xFC77, &[], None, &mut io),
        Err(Error::Fault(Fault::UnknownCommand(0xFC77)))
    );
    assert!(io.written.is_empty());
}

#[test]
fn inbound_acl_for_unknown_connection_dropped() {
    let (mut tl, mut io) = setup();
    let buf = tl.acl_rx_data_alloc(0x0009, 4);
    tl.acl_rx_data_received(0x0009, buf, &mut io).unwrap();
    assert!(io.delivered.is_empty());
}
