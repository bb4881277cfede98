use super::*;
use std::io::Read as _;

#[test]
fn new_channel_starts_created() {
    let ch = FrameChannel::new().unwrap();
    assert_eq!(ch.state(), ChannelState::Created);
}

#[test]
fn binding_read_closes_the_write_end() {
    let mut ch = FrameChannel::new().unwrap();
    let reader = ch.bind_read().unwrap();
    // With the only writer gone, the reader sees EOF immediately.
    let mut buf = Vec::new();
    assert_eq!(reader.read_to_end(&mut buf).unwrap(), 0);
    assert_eq!(ch.state(), ChannelState::ReadBound);
}

#[test]
fn binding_write_closes_the_read_end() {
    let mut ch = FrameChannel::new().unwrap();
    ch.bind_write().unwrap();
    assert_eq!(ch.state(), ChannelState::WriteBound);
    // No reader left: the write fails instead of blocking.
    let err = ch.write_frame(&[0u8; 16]).unwrap_err();
    assert!(matches!(err, BounceError::Transport(_)), "{err}");
}

#[test]
fn rebinding_same_role_is_allowed_but_opposite_role_is_not() {
    let mut ch = FrameChannel::new().unwrap();
    ch.bind_write().unwrap();
    ch.bind_write().unwrap();
    assert!(matches!(ch.bind_read(), Err(BounceError::Channel(_))));
    assert_eq!(ch.state(), ChannelState::WriteBound);

    let mut ch = FrameChannel::new().unwrap();
    ch.bind_read().unwrap();
    assert!(matches!(ch.bind_write(), Err(BounceError::Channel(_))));
    assert_eq!(ch.state(), ChannelState::ReadBound);
}

#[test]
fn close_happens_exactly_once() {
    let mut ch = FrameChannel::new().unwrap();
    assert!(ch.close().is_err());
    assert_eq!(ch.state(), ChannelState::Created);

    ch.bind_write().unwrap();
    ch.close().unwrap();
    assert_eq!(ch.state(), ChannelState::Closed);
    assert!(matches!(ch.close(), Err(BounceError::Channel(_))));
    assert!(ch.bind_write().is_err());
    assert!(matches!(
        ch.write_frame(&[1, 2, 3, 4]),
        Err(BounceError::Transport(_))
    ));
}

#[test]
fn child_stdin_is_only_available_before_binding() {
    let mut ch = FrameChannel::new().unwrap();
    let _stdin = ch.child_stdin().unwrap();
    ch.bind_write().unwrap();
    assert!(ch.child_stdin().is_err());
}

#[test]
fn writes_arrive_through_a_duplicated_read_end() {
    let mut ch = FrameChannel::new().unwrap();
    let Ends::Created { reader, .. } = &ch.ends else {
        panic!("fresh channel should hold both ends");
    };
    let mut dup = reader.try_clone().unwrap();
    ch.bind_write().unwrap();

    ch.write_frame(&[9u8; 8]).unwrap();
    ch.close().unwrap();

    let mut buf = Vec::new();
    dup.read_to_end(&mut buf).unwrap();
    assert_eq!(buf, vec![9u8; 8]);
}
