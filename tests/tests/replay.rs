use pnet_packet::ethernet::EtherTypes;
use pnet_packet::ip::IpNextHeaderProtocols;
use upf::{Config, DiagnosticsConfig, FrameSource, Upf, VerdictStats};
use upf_tests::framework::{init_logging, replay, write_replay_file};
use upf_tests::{FrameBuilder, non_ip_frame};

#[async_std::test]
async fn replay_counts_every_verdict() -> anyhow::Result<()> {
    let g_pdu = FrameBuilder::gtpu().build();
    let frames = vec![
        // Forward x4
        g_pdu.clone(),
        FrameBuilder::gtpu().vlan(EtherTypes::Vlan).build(),
        FrameBuilder::gtpu()
            .outer_protocol(IpNextHeaderProtocols::Tcp)
            .build(),
        non_ip_frame(EtherTypes::Arp),
        // Drop x2
        FrameBuilder::gtpu().inner_version(6).build(),
        g_pdu[..46].to_vec(),
        // Abort x1
        g_pdu[..20].to_vec(),
    ];
    let rx_bytes = frames.iter().map(Vec::len).sum();

    let stats = replay("verdicts", &frames, Config::default()).await?;
    assert_eq!(
        stats,
        VerdictStats {
            rx_pkts: 7,
            rx_bytes,
            forwarded: 4,
            dropped: 2,
            aborted: 1,
            diagnostics_suppressed: 0,
        }
    );
    Ok(())
}

#[async_std::test]
async fn diagnostics_budget_does_not_change_verdicts() -> anyhow::Result<()> {
    let frames = vec![FrameBuilder::gtpu().inner_version(6).build(); 50];
    let config = Config {
        diagnostics: DiagnosticsConfig {
            enabled: true,
            max_events_per_second: 1,
        },
        ..Config::default()
    };

    let stats = replay("budget", &frames, config).await?;
    assert_eq!(stats.rx_pkts, 50);
    assert_eq!(stats.dropped, 50);
    assert_eq!(stats.forwarded + stats.aborted, 0);
    assert!(stats.diagnostics_suppressed > 0);
    Ok(())
}

#[async_std::test]
async fn empty_replay_completes() -> anyhow::Result<()> {
    let stats = replay("empty", &[], Config::default()).await?;
    assert_eq!(stats, VerdictStats::default());
    Ok(())
}

#[async_std::test]
async fn rx_stopped_resolves_when_pipeline_exits() -> anyhow::Result<()> {
    let frames = vec![FrameBuilder::gtpu().build(); 3];
    let path = write_replay_file("stopped", &frames)?;
    let upf = Upf::start(
        Config::default(),
        FrameSource::Replay(path.clone()),
        init_logging(),
    )
    .await?;

    // The pipeline exits by itself once the replay runs dry, without a shutdown.
    upf.rx_stopped().await;
    assert_eq!(upf.stats().rx_pkts, 3);
    assert_eq!(upf.stats().forwarded, 3);

    let stats = upf.graceful_shutdown().await;
    assert_eq!(stats.rx_pkts, 3);
    std::fs::remove_file(path)?;
    Ok(())
}
