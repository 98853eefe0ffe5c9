//! Byte stream in, routed messages out.

use bthci::HciConfig;
use bthci::hci::consts::{PacketType, op, status};
use bthci::hci::h4::encode_frame;
use bthci::hci::msg::{Dest, MsgKind};
use bthci::hci::{H4Decoder, HciTl, Role};

use crate::mock_io::MockIo;

fn setup() -> (HciTl, MockIo) {
    let config = HciConfig::default();
    let io = MockIo::new(&config);
    (HciTl::new(config).unwrap(), io)
}

fn pump(dec: &mut H4Decoder, tl: &mut HciTl, role: Role, mut data: &[u8], io: &mut MockIo) {
    while !data.is_empty() {
        if let Some(pkt) = dec.feed(&mut data) {
            tl.receive(role, pkt, io).unwrap();
        }
    }
}

#[test]
fn controller_stream_dispatched() {
    let (mut tl, mut io) = setup();
    io.links.add_ble(1).unwrap();
    let mut dec = H4Decoder::new();

    let stream = [
        0x01, 0x06, 0x04, 0x03, 0x01, 0x00, 0x13, // disconnect handle 1
        0x02, 0x01, 0x00, 0x03, 0x00, 0xDE, 0xAD, 0x01, // ACL on handle 1
        0x01, 0xFF, 0xFF, 0x00, // unknown opcode
    ];
    // Byte by byte, as a UART driver would deliver them.
    for b in &stream {
        pump(&mut dec, &mut tl, Role::Controller, core::slice::from_ref(b), &mut io);
    }

    assert_eq!(io.delivered.len(), 2);
    assert_eq!(io.delivered[0].kind, MsgKind::Command);
    assert_eq!(io.delivered[0].dest, Dest::Llc(1));
    assert_eq!(io.delivered[1].kind, MsgKind::AclData);
    assert_eq!(io.delivered[1].data_buffer().unwrap().payload(), &[0xDE, 0xAD, 0x01]);
    assert_eq!(io.written.len(), 1);
    assert_eq!(io.last_frame()[3..5], [0xFF, 0xFF]);
}

#[test]
fn over_length_command_answered_not_dropped() {
    let (mut tl, mut io) = setup();
    io.links.add_ble(1).unwrap();
    let mut dec = H4Decoder::new();

    // Disconnect takes three parameter bytes; four declared.
    let stream = [0x01, 0x06, 0x04, 0x04, 0x01, 0x00, 0x13, 0xFF];
    pump(&mut dec, &mut tl, Role::Controller, &stream, &mut io);

    assert!(io.delivered.is_empty());
    assert_eq!(io.written.len(), 1);
    assert_eq!(
        io.last_frame(),
        [0x0F, 4, status::INVALID_HCI_PARAMETERS, 5, 0x06, 0x04]
    );
    assert_eq!(tl.cmd_credits(), 5);

    // The stream stays in sync: the next command is routed normally.
    tl.tx_done(&mut io).unwrap();
    let well_formed = [0x01, 0x06, 0x04, 0x03, 0x01, 0x00, 0x13];
    pump(&mut dec, &mut tl, Role::Controller, &well_formed, &mut io);
    assert_eq!(io.delivered.len(), 1);
    assert_eq!(io.delivered[0].dest, Dest::Llc(1));
}

#[test]
fn host_stream_dispatched() {
    let (mut tl, mut io) = setup();
    let idx = io.links.host_connect(0x0002).unwrap();
    let mut dec = H4Decoder::new();

    let stream = [
        0x04, 0x0E, 0x04, 0x01, 0x03, 0x0C, 0x00, // reset complete
        0x02, 0x02, 0x20, 0x02, 0x00, 0x10, 0x20, // ACL in on handle 2
        0x01, 0x03, 0x0C, 0x00, // command: not expected by a Host
    ];
    pump(&mut dec, &mut tl, Role::Host, &stream, &mut io);

    assert_eq!(io.delivered.len(), 2);
    assert_eq!(io.delivered[0].id, op::RESET);
    assert_eq!(io.delivered[0].dest, Dest::Gapm);
    assert_eq!(io.delivered[1].dest, Dest::L2cc(idx));
    assert_eq!(io.delivered[1].data_buffer().unwrap().payload(), &[0x10, 0x20]);
}

#[test]
fn written_frames_reencode_to_the_same_packets() {
    let (mut tl, mut io) = setup();
    tl.command_received(0xFFFF, &[], &mut io).unwrap();

    let (ptype, frame) = io.written[0].clone();
    assert_eq!(ptype, PacketType::Event);
    let mut wire = [0u8; 16];
    let n = encode_frame(ptype, &frame, &mut wire).unwrap();

    let mut dec = H4Decoder::new();
    let mut data = &wire[..n];
    let pkt = dec.feed(&mut data).unwrap();
    assert!(data.is_empty());
    assert_eq!(pkt.packet_type(), PacketType::Event);
}
