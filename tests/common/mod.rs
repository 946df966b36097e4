//! Shared utilities for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use spa_shell::config::{Reload, ShellConfig};
use spa_shell::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A server running on an ephemeral port.
#[allow(dead_code)]
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub reload_tx: mpsc::UnboundedSender<Reload>,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server for `config`, bound to 127.0.0.1 on a free port.
#[allow(dead_code)]
pub async fn start_server(mut config: ShellConfig) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let (reload_tx, reloads) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        server.run(listener, reloads, server_shutdown).await
    });

    RunningServer {
        addr,
        shutdown,
        reload_tx,
        handle,
    }
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small front-end project: entry, router, single-file components, SCSS with partials.
#[allow(dead_code)]
pub fn write_fixture_project(root: &Path) {
    write(
        root,
        "resources/app/main.js",
        "import Vue from 'vue'\nimport router from './router/index'\nimport App from '@/App.vue'\n\nnew Vue({ el: '#app', router, render: h => h(App) })\n",
    );
    write(
        root,
        "resources/app/router/index.js",
        "import Router from 'vue-router'\nimport Home from '@/views/Home.vue'\n\nexport default new Router({\n  mode: 'history',\n  routes: [\n    { path: '/', name: 'Home', component: Home },\n    { path: '/about', name: 'About', component: require('@/views/About.vue') },\n    { path: '*', name: 'NotFound', component: require('~/views/NotFound.vue') },\n  ],\n})\n",
    );
    write(
        root,
        "resources/app/App.vue",
        "<template>\n  <div id=\"app\">\n    <router-link to=\"/\">Home</router-link>\n    <router-view />\n  </div>\n</template>\n\n<script>\nimport Vue from 'vue'\n\nexport default {\n  name: 'App',\n}\n</script>\n\n<style>\n#app nav { padding: 30px; }\n</style>\n",
    );
    write(
        root,
        "resources/app/views/Home.vue",
        "<template>\n  <div class=\"home\"><h1>Home</h1></div>\n</template>\n",
    );
    write(
        root,
        "resources/app/views/About.vue",
        "<template>\n  <div class=\"about\"><h1>{{ title }}</h1></div>\n</template>\n\n<script>\nexport default {\n  name: 'About',\n  data: () => ({ title: 'About' }),\n}\n</script>\n",
    );
    write(
        root,
        "resources/app/views/NotFound.vue",
        "<template>\n  <h1>Not found</h1>\n</template>\n",
    );
    write(
        root,
        "resources/assets/scss/app.scss",
        "@import '@sass/variables';\n@import 'layout';\n\nbody { color: $text; background: url('/img/bg.png'); }\n",
    );
    write(root, "resources/assets/scss/_layout.scss", "#app { margin: 0 auto; }\n");
    write(root, "resources/assets/sass/_variables.scss", "$text: #2c3e50;\n");
}

/// Config whose assets live under `root`.
#[allow(dead_code)]
pub fn config_for(root: &Path) -> ShellConfig {
    let mut config = ShellConfig::default().with_defaults_applied();
    config.assets.root = root.to_string_lossy().into_owned();
    config
}
