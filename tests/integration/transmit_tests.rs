//! Transmit path: queue priority, report filtering and buffer release.

use bthci::HciConfig;
use bthci::hci::consts::{PacketType, evt, le_evt};
use bthci::hci::msg::{DataBuffer, Dest, Message, MsgKind, Origin, Pool, PoolToken};
use bthci::hci::{HciTl, TxState};

use crate::mock_io::MockIo;

fn setup() -> (HciTl, MockIo) {
    let config = HciConfig::default();
    let io = MockIo::new(&config);
    (HciTl::new(config).unwrap(), io)
}

fn hw_error(code: u8) -> Message {
    Message::with_params(MsgKind::Event, u16::from(evt::HW_ERR), Dest::Hci, &[code])
}

fn acl(hdl_flags: u16, pool: Pool, slot: u16) -> Message {
    let buf = DataBuffer::new(Origin::Pool(pool, PoolToken::new(slot)), 4, 2);
    Message::data(MsgKind::AclData, hdl_flags, Dest::Hci, buf)
}

fn sync(hdl_flags: u16, slot: u16) -> Message {
    let buf = DataBuffer::new(Origin::Pool(Pool::Bt, PoolToken::new(slot)), 3, 2);
    Message::data(MsgKind::SyncData, hdl_flags, Dest::Hci, buf)
}

fn legacy_report() -> Message {
    Message::with_params(
        MsgKind::LeEvent,
        u16::from(le_evt::ADV_REPORT),
        Dest::Hci,
        &[le_evt::ADV_REPORT, 0],
    )
}

#[test]
fn control_before_sync_before_acl() {
    let (mut tl, mut io) = setup();
    tl.tl_send(hw_error(0), &mut io).unwrap();
    assert_eq!(tl.tx_state(), TxState::Ongoing);

    // Queued while the first event is on the wire: B (ACL), C (SYNC), A (event).
    tl.tl_send(acl(0x0001, Pool::Ble, 11), &mut io).unwrap();
    tl.tl_send(sync(0x0180, 12), &mut io).unwrap();
    tl.tl_send(hw_error(0xA), &mut io).unwrap();
    assert_eq!(tl.queue_lens(), (1, 1, 1));

    for _ in 0..3 {
        tl.tx_done(&mut io).unwrap();
    }
    let order: Vec<PacketType> = io.written.iter().map(|(t, _)| *t).collect();
    assert_eq!(
        order,
        [PacketType::Event, PacketType::Event, PacketType::Sync, PacketType::Acl]
    );
    assert_eq!(io.written[1].1, vec![evt::HW_ERR, 1, 0xA]);

    tl.tx_done(&mut io).unwrap();
    assert_eq!(tl.tx_state(), TxState::Idle);
    assert_eq!(tl.queue_lens(), (0, 0, 0));
}

#[test]
fn acl_buffer_returned_only_after_completion() {
    let (mut tl, mut io) = setup();
    tl.tl_send(acl(0x2001, Pool::Ble, 7), &mut io).unwrap();
    assert_eq!(io.written[0], (PacketType::Acl, vec![0x01, 0x20, 2, 0, 0, 0]));
    assert!(io.frees().is_empty());
    assert!(tl.current().is_some());

    tl.tx_done(&mut io).unwrap();
    assert_eq!(io.frees(), [(Pool::Ble, 7)]);
    assert_eq!(io.freed_msgs, 1);

    // BT range goes back to the BT pool.
    tl.tl_send(acl(0x0080, Pool::Bt, 8), &mut io).unwrap();
    tl.tx_done(&mut io).unwrap();
    assert_eq!(io.frees(), [(Pool::Ble, 7), (Pool::Bt, 8)]);
}

#[test]
fn report_fragments_stop_at_ceiling() {
    let (mut tl, mut io) = setup();
    // Ceiling of four: one on the wire, three queued, two dropped.
    for _ in 0..6 {
        tl.tl_send(legacy_report(), &mut io).unwrap();
    }
    assert_eq!(io.written.len(), 1);
    assert_eq!(io.last_frame(), [evt::LE_META, 2, le_evt::ADV_REPORT, 0]);
    assert_eq!(tl.queue_lens(), (3, 0, 0));
    assert_eq!(io.freed_msgs, 2);
    assert_eq!(tl.adv_filter().queued_fragments(), 4);

    // One transmitted: room for one more.
    tl.tx_done(&mut io).unwrap();
    assert_eq!(tl.adv_filter().queued_fragments(), 3);
    tl.tl_send(legacy_report(), &mut io).unwrap();
    assert_eq!(tl.queue_lens(), (3, 0, 0));
    tl.tl_send(legacy_report(), &mut io).unwrap();
    assert_eq!(io.freed_msgs, 4);
}

#[test]
fn other_events_pass_the_report_filter() {
    let (mut tl, mut io) = setup();
    for _ in 0..6 {
        tl.tl_send(legacy_report(), &mut io).unwrap();
    }
    tl.tl_send(hw_error(1), &mut io).unwrap();
    assert_eq!(tl.queue_lens(), (4, 0, 0));
}
