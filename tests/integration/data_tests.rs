//! Data path: ACL and SYNC payloads from the Host down to the link tasks.

use bthci::HciConfig;
use bthci::hci::HciTl;
use bthci::hci::consts::{evt, link_type};
use bthci::hci::msg::{Dest, Message, MsgKind, Origin, Pool};

use crate::mock_io::{MockIo, PoolCall};

fn setup() -> (HciTl, MockIo) {
    let config = HciConfig::default();
    let io = MockIo::new(&config);
    (HciTl::new(config).unwrap(), io)
}

#[test]
fn acl_round_trip_through_link_controller() {
    let (mut tl, mut io) = setup();
    io.links.add_ble(2).unwrap();

    let mut buf = tl.acl_tx_data_alloc(0x0002, 3, &mut io).unwrap().unwrap();
    assert!(matches!(buf.origin, Origin::Pool(Pool::Ble, _)));
    buf.payload_mut().copy_from_slice(&[1, 2, 3]);
    tl.acl_tx_data_received(0x0002, buf, &mut io).unwrap();

    let mut msg = io.delivered.remove(0);
    assert_eq!(msg.kind, MsgKind::AclData);
    assert_eq!(msg.dest, Dest::Llc(2));
    assert_eq!(msg.data_buffer().unwrap().payload(), &[1, 2, 3]);

    // The link controller loops the buffer back towards the Host.
    let buf = msg.take_data().unwrap();
    tl.tl_send(Message::data(MsgKind::AclData, 0x2002, Dest::Hci, buf), &mut io).unwrap();
    assert_eq!(io.last_frame(), [0x02, 0x20, 3, 0, 1, 2, 3]);
    tl.tx_done(&mut io).unwrap();

    assert_eq!(io.pool_calls, [PoolCall::Alloc(Pool::Ble, 1), PoolCall::Free(Pool::Ble, 1)]);
    assert_eq!(io.free_slots, (8, 8));
}

#[test]
fn exhausted_pool_reports_overflow_and_drops_payload() {
    let (mut tl, mut io) = setup();
    io.links.add_bt(0x0081, [9; 6]).unwrap();
    io.free_slots = (8, 0);

    let buf = tl.acl_tx_data_alloc(0x0081, 100, &mut io).unwrap().unwrap();
    assert!(buf.is_trash());
    assert!(tl.acl_trash());
    assert_eq!(io.last_frame(), [evt::DATA_BUF_OVFLW, 1, link_type::ACL]);

    tl.acl_tx_data_received(0x0081, buf, &mut io).unwrap();
    assert!(!tl.acl_trash());
    assert!(io.delivered.is_empty());
}

#[test]
fn oversize_or_unknown_acl_is_skipped() {
    let (mut tl, mut io) = setup();
    // BLE beyond max octets.
    assert!(tl.acl_tx_data_alloc(0x0001, 300, &mut io).unwrap().is_none());
    // BT link not established.
    assert!(tl.acl_tx_data_alloc(0x0082, 10, &mut io).unwrap().is_none());
    assert!(io.pool_calls.is_empty());
    assert!(io.written.is_empty());
}

#[test]
fn sync_reaches_link_of_its_acl_handle() {
    let (mut tl, mut io) = setup();
    io.links.add_bt(0x0080, [1; 6]).unwrap();

    let mut buf = tl.sync_tx_data_alloc(0x0180, 2, &mut io).unwrap();
    buf.payload_mut().copy_from_slice(&[0x55, 0x66]);
    tl.sync_tx_data_received(0x0180, buf, &mut io).unwrap();
    assert_eq!(io.delivered[0].kind, MsgKind::SyncData);
    assert_eq!(io.delivered[0].dest, Dest::Lc(0));

    // Pool empty: overflow event with the SYNC link type.
    io.free_slots = (8, 0);
    let buf = tl.sync_tx_data_alloc(0x0180, 2, &mut io).unwrap();
    assert!(buf.is_trash());
    assert_eq!(io.last_frame(), [evt::DATA_BUF_OVFLW, 1, link_type::SYNC]);
    tl.sync_tx_data_received(0x0180, buf, &mut io).unwrap();
    assert_eq!(io.delivered.len(), 1);
}
