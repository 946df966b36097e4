//! End-to-end tests against a live listener.

use std::time::Duration;

use std::fs;

use spa_shell::assets::{AssetManifest, Pipeline};
use spa_shell::config::{ConfigWatcher, Reload, RouteConfig, ShellConfig};
use spa_shell::http::{X_CLIENT_VIEW, X_REQUEST_ID};

mod common;

fn config_without_assets() -> ShellConfig {
    let dir = std::env::temp_dir().join("spa-shell-no-assets");
    common::config_for(&dir)
}

#[tokio::test]
async fn test_root_and_unmatched_paths_get_the_shell() {
    let server = common::start_server(config_without_assets()).await;
    let client = common::client();

    let index = client.get(server.url("/")).send().await.expect("server reachable");
    assert_eq!(index.status(), 200);
    assert_eq!(index.headers()[X_CLIENT_VIEW], "Home");
    assert!(index.headers().contains_key(X_REQUEST_ID));
    let index_body = index.text().await.unwrap();
    assert!(index_body.contains(r#"<div id="app"></div>"#));

    for (path, view) in [
        ("/about", "About"),
        ("/a-route-that-does-not-exist", "NotFound"),
        ("/users/42/settings", "NotFound"),
    ] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 200, "path {path}");
        assert_eq!(res.headers()[X_CLIENT_VIEW], view, "path {path}");
        assert_eq!(res.text().await.unwrap(), index_body, "path {path}");
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_built_assets_are_served_and_versioned() {
    let dir = tempfile::tempdir().unwrap();
    common::write_fixture_project(dir.path());
    let config = common::config_for(dir.path());
    Pipeline::new(config.assets.clone()).run().unwrap();

    let server = common::start_server(config).await;
    let client = common::client();

    let shell = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
    assert!(shell.contains(r#"<script src="/js/main.js?id="#));
    assert!(shell.contains(r#"href="/css/app.css?id="#));

    let js = client.get(server.url("/js/main.js")).send().await.unwrap();
    assert_eq!(js.status(), 200);
    assert!(js.headers().get(X_CLIENT_VIEW).is_none());
    assert!(js.text().await.unwrap().contains("\"resources/app/main.js\": function"));

    let css = client.get(server.url("/css/app.css")).send().await.unwrap();
    assert_eq!(css.status(), 200);
    assert_eq!(css.headers()["x-content-type-options"], "nosniff");

    // Anything else in the public dir is served too.
    fs::create_dir_all(dir.path().join("public/img")).unwrap();
    fs::write(dir.path().join("public/img/x.png"), b"png bytes").unwrap();
    let img = client.get(server.url("/img/x.png")).send().await.unwrap();
    assert_eq!(img.status(), 200);
    assert_eq!(img.headers()["content-type"], "image/png");
    assert_eq!(&img.bytes().await.unwrap()[..], b"png bytes");

    // A missing file is a client route like any other.
    let missing = client.get(server.url("/img/missing.png")).send().await.unwrap();
    assert_eq!(missing.status(), 200);
    assert_eq!(missing.headers()[X_CLIENT_VIEW], "NotFound");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_head_requests_get_empty_body() {
    let server = common::start_server(config_without_assets()).await;
    let client = common::client();

    for path in ["/", "/a-route-that-does-not-exist"] {
        let res = client.head(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 200, "path {path}");
        assert!(res.headers().contains_key(X_CLIENT_VIEW), "path {path}");
        assert!(res.bytes().await.unwrap().is_empty(), "path {path}");
    }

    let res = client.post(server.url("/about")).send().await.unwrap();
    assert_eq!(res.status(), 405);
    assert_eq!(res.headers()["allow"], "GET, HEAD");

    server.shutdown.trigger();
}

/// Fetch the shell until it references `script_url`, or give up.
async fn wait_for_script(server: &common::RunningServer, script_url: &str) -> bool {
    let client = common::client();
    for _ in 0..100 {
        let shell = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
        if shell.contains(&format!(r#"<script src="{script_url}""#)) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_rebuild_updates_versioned_urls() {
    let dir = tempfile::tempdir().unwrap();
    common::write_fixture_project(dir.path());
    let config = common::config_for(dir.path());
    let pipeline = Pipeline::new(config.assets.clone());
    let public = dir.path().join("public");

    pipeline.run().unwrap();
    let first = AssetManifest::load(&public).unwrap().unwrap().versioned("/js/main.js").to_string();

    let server = common::start_server(config).await;
    assert!(wait_for_script(&server, &first).await);

    fs::write(
        dir.path().join("resources/app/views/Home.vue"),
        "<template>\n  <h1>Welcome</h1>\n</template>\n",
    )
    .unwrap();
    pipeline.run().unwrap();
    let second = AssetManifest::load(&public).unwrap().unwrap().versioned("/js/main.js").to_string();
    assert_ne!(first, second);

    server.reload_tx.send(Reload::Assets).unwrap();
    assert!(wait_for_script(&server, &second).await, "shell still serves {first}");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_manifest_watch_reloads_shell() {
    let dir = tempfile::tempdir().unwrap();
    common::write_fixture_project(dir.path());
    let config = common::config_for(dir.path());
    let pipeline = Pipeline::new(config.assets.clone());
    let public = dir.path().join("public");
    pipeline.run().unwrap();

    let server = common::start_server(config).await;

    let (watcher, mut reloads) =
        ConfigWatcher::new(None, Some(&AssetManifest::path_in(&public)));
    let _watcher = watcher.run().unwrap();
    let reload_tx = server.reload_tx.clone();
    tokio::spawn(async move {
        while let Some(reload) = reloads.recv().await {
            let _ = reload_tx.send(reload);
        }
    });

    fs::write(
        dir.path().join("resources/app/views/About.vue"),
        "<template>\n  <h1>About us</h1>\n</template>\n",
    )
    .unwrap();
    pipeline.run().unwrap();
    let rebuilt = AssetManifest::load(&public).unwrap().unwrap().versioned("/js/main.js").to_string();

    assert!(wait_for_script(&server, &rebuilt).await, "manifest change was not picked up");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_config_reload_updates_shell() {
    let config = config_without_assets();
    let server = common::start_server(config.clone()).await;
    let client = common::client();

    let mut next = config;
    next.listener.bind_address = server.addr.to_string();
    next.shell.title = "Reloaded".into();
    next.routes.insert(1, RouteConfig::new("/contact", "Contact", "Contact"));
    server.reload_tx.send(Reload::Config(Box::new(next))).unwrap();

    let mut reloaded = false;
    for _ in 0..50 {
        let res = client.get(server.url("/contact")).send().await.unwrap();
        if res.headers()[X_CLIENT_VIEW] == "Contact" {
            assert!(res.text().await.unwrap().contains("<title>Reloaded</title>"));
            reloaded = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(reloaded, "reloaded config was never applied");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let server = common::start_server(config_without_assets()).await;
    server.shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server stops after shutdown")
        .expect("server task did not panic");
    assert!(result.is_ok());
}
