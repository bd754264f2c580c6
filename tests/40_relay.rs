mod common;

use anyhow::Result;

use common::{expect_silence, next_frame, TestServer};
use mesob_helpdesk::api::{BroadcastRequest, TicketPatch};
use mesob_helpdesk::auth::Role;
use mesob_helpdesk::client::{QueryCache, RelayClient, RelayIdentity, RelaySession};
use mesob_helpdesk::filter::TicketFilter;
use mesob_helpdesk::relay::{BroadcastTarget, RelayEvent, Viewer};
use mesob_helpdesk::types::{Priority, TicketStatus};

#[tokio::test]
async fn members_join_their_own_room() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (_socket, reply) = server.join("abebe@mesob.et", 1).await?;
    assert_eq!(reply["event"], "joined");
    assert_eq!(reply["data"]["companyId"], 1);

    let (_socket, reply) = server.join("abebe@mesob.et", 2).await?;
    assert_eq!(reply["event"], "error");
    assert!(reply["data"]["message"].as_str().is_some_and(|m| m.contains("company 2")));

    let (_socket, reply) = server.join("super@mesob.et", 2).await?;
    assert_eq!(reply["event"], "joined");
    Ok(())
}

#[tokio::test]
async fn ticket_writes_reach_only_their_tenant() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (mut mesob, _) = server.join("admin@mesob.et", 1).await?;
    let (mut abay, _) = server.join("admin@abay.et", 2).await?;

    let ticket = server.file_ticket("abebe@mesob.et", "Server room hot", "Facilities").await?;

    let frame = next_frame(&mut mesob).await?.expect("created event");
    assert_eq!(frame["event"], "ticket_created");
    assert_eq!(frame["data"]["_id"], serde_json::json!(ticket.id));
    expect_silence(&mut abay).await?;

    let admin = server.client("admin@mesob.et").await?;
    admin
        .update_ticket(
            ticket.id,
            &TicketPatch {
                priority: Some(Priority::Critical),
                ..Default::default()
            },
        )
        .await?;

    let frame = next_frame(&mut mesob).await?.expect("updated event");
    assert_eq!(frame["event"], "ticket_updated");
    assert_eq!(frame["data"]["priority"], "Critical");
    expect_silence(&mut abay).await?;
    Ok(())
}

#[tokio::test]
async fn invalid_tokens_cannot_upgrade() -> Result<()> {
    let server = TestServer::spawn().await?;
    let url = format!("ws://127.0.0.1:{}/api/relay?token=bogus", server.port);
    assert!(tokio_tungstenite::connect_async(url.as_str()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn broadcasts_reach_their_audience() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (mut employee, _) = server.join("abebe@mesob.et", 1).await?;
    let (mut technician, _) = server.join("tigist@mesob.et", 1).await?;
    let (mut abay, _) = server.join("hana@abay.et", 2).await?;

    let admin = server.client("admin@mesob.et").await?;
    let receipt = admin
        .broadcast(&BroadcastRequest {
            message: "Network maintenance at 18:00".to_string(),
            target: BroadcastTarget::Company(1),
        })
        .await?;
    assert_eq!(receipt.delivered, 2);

    for socket in [&mut employee, &mut technician] {
        let frame = next_frame(socket).await?.expect("company broadcast");
        assert_eq!(frame["event"], "broadcast_message");
        assert_eq!(frame["data"]["message"], "Network maintenance at 18:00");
        assert_eq!(frame["data"]["sender"], "Kebede Tadesse");
    }
    expect_silence(&mut abay).await?;

    admin
        .broadcast(&BroadcastRequest {
            message: "Technicians: stand-up in 5".to_string(),
            target: BroadcastTarget::Role(Role::Technician),
        })
        .await?;
    let frame = next_frame(&mut technician).await?.expect("role broadcast");
    assert_eq!(frame["data"]["target"]["value"], "technician");
    expect_silence(&mut employee).await?;
    expect_silence(&mut abay).await?;

    let root = server.client("super@mesob.et").await?;
    root.broadcast(&BroadcastRequest {
        message: "Holiday on Friday".to_string(),
        target: BroadcastTarget::All,
    })
    .await?;
    for socket in [&mut employee, &mut technician, &mut abay] {
        let frame = next_frame(socket).await?.expect("global broadcast");
        assert_eq!(frame["data"]["message"], "Holiday on Friday");
    }
    Ok(())
}

#[tokio::test]
async fn company_admins_cannot_broadcast_outside_their_tenant() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.client("admin@mesob.et").await?;

    for target in [BroadcastTarget::All, BroadcastTarget::Company(2)] {
        let err = admin
            .broadcast(&BroadcastRequest {
                message: "hello".to_string(),
                target,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    let employee = server.client("abebe@mesob.et").await?;
    let err = employee
        .broadcast(&BroadcastRequest {
            message: "hello".to_string(),
            target: BroadcastTarget::Company(1),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    Ok(())
}

#[tokio::test]
async fn employees_only_hear_about_their_own_tickets() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (mut employee, _) = server.join("abebe@mesob.et", 1).await?;
    let (mut admin, _) = server.join("admin@mesob.et", 1).await?;

    let private = server.file_ticket("admin@mesob.et", "Payroll server credentials", "Security").await?;
    let frame = next_frame(&mut admin).await?.expect("created event");
    assert_eq!(frame["data"]["_id"], serde_json::json!(private.id));
    expect_silence(&mut employee).await?;

    let own = server.file_ticket("abebe@mesob.et", "Printer jam", "Hardware").await?;
    let frame = next_frame(&mut employee).await?.expect("own ticket event");
    assert_eq!(frame["event"], "ticket_created");
    assert_eq!(frame["data"]["_id"], serde_json::json!(own.id));

    let client = server.client("admin@mesob.et").await?;
    client
        .update_ticket(
            private.id,
            &TicketPatch {
                priority: Some(Priority::High),
                ..Default::default()
            },
        )
        .await?;
    expect_silence(&mut employee).await?;
    Ok(())
}

/// Give the relay a moment to deliver, then take whatever arrived
async fn settle(session: &mut RelaySession) -> Vec<RelayEvent> {
    tokio::time::sleep(std::time::Duration::from_millis(400)).await;
    session.drain()
}

#[tokio::test]
async fn relay_session_follows_the_signed_in_identity() -> Result<()> {
    let server = TestServer::spawn().await?;
    let mesob = RelayIdentity {
        url: server.client("admin@mesob.et").await?.relay_url()?,
        company_id: 1,
    };
    let abay = RelayIdentity {
        url: server.client("admin@abay.et").await?.relay_url()?,
        company_id: 2,
    };

    let mut session = RelaySession::new();
    assert!(session.ensure(&mesob).await);

    // Same identity keeps the live connection and its queued events
    let first = server.file_ticket("abebe@mesob.et", "Monitor flicker", "Hardware").await?;
    tokio::time::sleep(std::time::Duration::from_millis(400)).await;
    assert!(session.ensure(&mesob).await);
    let events = session.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, RelayEvent::TicketCreated(t) if t.id == first.id)));

    // A different identity replaces it
    assert!(session.ensure(&abay).await);
    server.file_ticket("abebe@mesob.et", "Mouse broken", "Hardware").await?;
    assert!(settle(&mut session).await.is_empty());

    let theirs = server.file_ticket("hana@abay.et", "Email quota", "Email").await?;
    let events = settle(&mut session).await;
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], RelayEvent::TicketCreated(t) if t.id == theirs.id));

    session.disconnect();
    assert!(!session.is_connected());
    server.file_ticket("hana@abay.et", "Shared drive", "Storage").await?;
    assert!(settle(&mut session).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn relay_client_keeps_the_cache_current() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.client("admin@mesob.et").await?;
    let mut relay = RelayClient::connect(&admin.relay_url()?, 1).await?;
    assert!(relay.is_connected());
    assert_eq!(relay.company_id(), 1);

    let filter = TicketFilter::unassigned();
    let mut cache = QueryCache::new(Some(Viewer {
        user_id: admin.whoami().await?.id,
        company_id: 1,
        role: Role::CompanyAdmin,
    }));
    cache.replace(filter.clone(), admin.list_tickets(&filter).await?);
    assert_eq!(cache.get(&filter).map(|t| t.len()), Some(0));

    let ticket = server.file_ticket("abebe@mesob.et", "Keyboard", "Hardware").await?;
    let event = tokio::time::timeout(std::time::Duration::from_secs(2), relay.next())
        .await?
        .expect("created event");
    assert!(matches!(&event, RelayEvent::TicketCreated(t) if t.id == ticket.id));
    assert!(cache.apply(&event));

    // The refetch and the event agree
    cache.replace(filter.clone(), admin.list_tickets(&filter).await?);
    let cached = cache.get(&filter).unwrap_or(&[]);
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, ticket.id);

    admin
        .update_ticket(
            ticket.id,
            &TicketPatch {
                status: Some(TicketStatus::Resolved),
                ..Default::default()
            },
        )
        .await?;
    let event = tokio::time::timeout(std::time::Duration::from_secs(2), relay.next())
        .await?
        .expect("updated event");
    cache.apply(&event);
    assert_eq!(cache.get(&filter).unwrap_or(&[])[0].status, TicketStatus::Resolved);
    assert!(relay.drain().is_empty());
    Ok(())
}

#[tokio::test]
async fn joining_a_foreign_room_is_refused_client_side() -> Result<()> {
    let server = TestServer::spawn().await?;
    let employee = server.client("abebe@mesob.et").await?;
    let err = RelayClient::connect(&employee.relay_url()?, 2).await.err().expect("join refused");
    assert!(matches!(err, mesob_helpdesk::client::RelayError::Rejected(_)));
    Ok(())
}
