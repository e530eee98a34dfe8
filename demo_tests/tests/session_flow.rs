//! Socket-level integration tests for the client session.

use demo_shared::math::Vec2;
use demo_shared::protocol::{ClientMsg, GameState, Player, PlayerId, ServerMsg};
use demo_tests::{connect_pair, init_tracing, tick_until};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn session_tracks_remote_player_lifecycle() -> anyhow::Result<()> {
    init_tracing();
    let (mut server, mut session) = connect_pair().await?;

    session.start().await?;

    // The server sees the announcement followed by the snapshot request.
    let local = match server.next_client_msg().await? {
        ClientMsg::PlayerEnter { player } => player,
        other => anyhow::bail!("expected PlayerEnter, got {other:?}"),
    };
    assert_eq!(local.id, session.local_player().id);
    assert!(matches!(
        server.next_client_msg().await?,
        ClientMsg::GetGameState
    ));

    // Catch-up snapshot listing the local player and one remote.
    let p2 = Player {
        id: PlayerId("p2".to_string()),
        position: Vec2::new(1.0, 1.0),
    };
    let mut state = GameState::default();
    for p in [local.clone(), p2.clone()] {
        state.connection_ids.push(p.id.clone());
        state.player_id_to_player.insert(p.id.clone(), p);
    }
    server
        .push(&ServerMsg::GameState { game_state: state })
        .await?;

    assert!(
        tick_until(&mut session, |s| s.registry().tracked_count() == 1).await?,
        "snapshot never applied"
    );
    assert!(session.registry().is_tracked(&p2.id));
    assert!(!session.registry().is_tracked(&local.id));

    // Remote movement reaches the scene.
    server
        .push(&ServerMsg::PlayerUpdate {
            player: Player {
                id: p2.id.clone(),
                position: Vec2::new(3.0, 4.0),
            },
        })
        .await?;
    assert!(
        tick_until(&mut session, |s| {
            s.registry().position_of(&p2.id) == Some(Vec2::new(3.0, 4.0))
        })
        .await?,
        "update never applied"
    );

    // Remote exit empties the registry and the scene.
    server
        .push(&ServerMsg::PlayerExit { player: p2.clone() })
        .await?;
    assert!(
        tick_until(&mut session, |s| s.registry().tracked_count() == 0).await?,
        "exit never applied"
    );
    assert_eq!(session.registry().presentation().entity_count(), 0);

    session.close("test done").await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn session_relays_local_movement_and_exit() -> anyhow::Result<()> {
    init_tracing();
    let (mut server, mut session) = connect_pair().await?;

    session.start().await?;
    server.next_client_msg().await?; // enter
    server.next_client_msg().await?; // get game state

    // Still: a tick sends nothing, so moving afterwards must produce the
    // very next frame the server reads.
    session.tick().await?;
    session
        .registry_mut()
        .presentation_mut()
        .set_local_position(Vec2::new(5.0, 0.0));
    session.tick().await?;

    match server.next_client_msg().await? {
        ClientMsg::PlayerUpdate { player } => {
            assert_eq!(player.id, session.local_player().id);
            assert_eq!(player.position, Vec2::new(5.0, 0.0));
        }
        other => anyhow::bail!("expected PlayerUpdate, got {other:?}"),
    }

    session.close("test done").await?;
    match server.next_client_msg().await? {
        ClientMsg::PlayerExit { player } => {
            assert_eq!(player.id, session.local_player().id);
        }
        other => anyhow::bail!("expected PlayerExit, got {other:?}"),
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_server_messages_do_not_disturb_the_session() -> anyhow::Result<()> {
    init_tracing();
    let (mut server, mut session) = connect_pair().await?;

    session.start().await?;
    server.next_client_msg().await?;
    server.next_client_msg().await?;

    // A message kind from a newer server, then a valid enter behind it.
    server
        .push_raw(r#"{"messageType":"SERVER_MESSAGE_TYPE_EMOTE","emote":"wave"}"#)
        .await?;
    server
        .push(&ServerMsg::PlayerEnter {
            player: Player {
                id: PlayerId("p2".to_string()),
                position: Vec2::ZERO,
            },
        })
        .await?;

    assert!(
        tick_until(&mut session, |s| s.registry().tracked_count() == 1).await?,
        "enter behind the unknown message never applied"
    );

    session.close("test done").await?;
    Ok(())
}
