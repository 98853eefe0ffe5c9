//! Command path: Host command in, routed message or rejection out.

use bthci::HciConfig;
use bthci::hci::HciTl;
use bthci::hci::consts::{PacketType, op, status};
use bthci::hci::msg::{Dest, Message, MsgKind};

use crate::mock_io::MockIo;

fn setup() -> (HciTl, MockIo) {
    let config = HciConfig::default();
    let io = MockIo::new(&config);
    (HciTl::new(config).unwrap(), io)
}

#[test]
fn unknown_opcode_gets_complete_with_single_status() {
    let (mut tl, mut io) = setup();
    tl.command_received(0xFFFF, &[0x01, 0x02], &mut io).unwrap();

    assert!(io.delivered.is_empty());
    assert_eq!(io.written.len(), 1);
    assert_eq!(io.written[0].0, PacketType::Event);
    assert_eq!(io.last_frame(), [0x0E, 4, 5, 0xFF, 0xFF, status::UNKNOWN_HCI_COMMAND]);
}

#[test]
fn short_parameters_rejected_as_invalid() {
    let (mut tl, mut io) = setup();
    io.links.add_ble(1).unwrap();

    // Handle and timeout: accepted.
    tl.command_received(op::WR_AUTH_PAYL_TO, &[0x01, 0x00, 0x20, 0x03], &mut io).unwrap();
    assert_eq!(io.delivered.len(), 1);
    assert_eq!(io.delivered[0].dest, Dest::Llc(1));

    // Handle only: the link resolves but the timeout is missing.
    tl.command_received(op::WR_AUTH_PAYL_TO, &[0x01, 0x00], &mut io).unwrap();
    assert_eq!(io.delivered.len(), 1);
    assert_eq!(
        io.last_frame(),
        [0x0E, 6, 4, 0x7C, 0x0C, status::INVALID_HCI_PARAMETERS, 0x00, 0x00]
    );
}

#[test]
fn credits_run_out_then_recover() {
    let (mut tl, mut io) = setup();
    for _ in 0..5 {
        tl.command_received(op::RESET, &[], &mut io).unwrap();
    }
    assert_eq!(io.delivered.len(), 5);
    assert_eq!(tl.cmd_credits(), 0);

    // Sixth command with no credit left.
    tl.command_received(op::RESET, &[], &mut io).unwrap();
    assert_eq!(io.delivered.len(), 5);
    assert_eq!(io.last_frame(), [0x0E, 4, 0, 0x03, 0x0C, status::MEMORY_CAPACITY_EXCEEDED]);

    // The link manager answers the first reset; its completion returns a credit.
    let reply = Message::with_params(MsgKind::CmdCmpEvt, op::RESET, Dest::Hci, &[status::SUCCESS]);
    tl.tl_send(reply, &mut io).unwrap();
    tl.tx_done(&mut io).unwrap();
    assert_eq!(io.last_frame(), [0x0E, 4, 1, 0x03, 0x0C, status::SUCCESS]);
    assert!(tl.cmd_credits() <= 5);
}

#[test]
fn credit_never_exceeds_ceiling() {
    let (mut tl, mut io) = setup();
    for _ in 0..8 {
        tl.tl_send(Message::command_status(op::DISCONNECT, status::SUCCESS), &mut io).unwrap();
        tl.tx_done(&mut io).unwrap();
    }
    assert_eq!(tl.cmd_credits(), 5);
    assert!(io.written.iter().all(|(_, f)| f[3] <= 5));
}

#[test]
fn unknown_connection_on_status_command() {
    let (mut tl, mut io) = setup();
    tl.command_received(op::DISCONNECT, &[0x03, 0x00, 0x13], &mut io).unwrap();
    assert_eq!(io.last_frame(), [0x0F, 4, status::UNKNOWN_CONNECTION_ID, 5, 0x06, 0x04]);

    io.links.add_ble(3).unwrap();
    tl.tx_done(&mut io).unwrap();
    tl.command_received(op::DISCONNECT, &[0x03, 0x00, 0x13], &mut io).unwrap();
    assert_eq!(io.delivered[0].dest, Dest::Llc(3));
    assert_eq!(io.delivered[0].kind, MsgKind::Command);
}
