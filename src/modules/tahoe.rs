//! Distributed file storage through Tahoe-LAFS.
//!
//! Introducer management lives in [`crate::tahoe`]; this is the module's
//! install and service wiring.

use crate::modules::{AppModule, MenuEntry, RunAs, SetupStep, ShortcutSpec};
use crate::service::ServiceSpec;
use crate::tahoe::node::ACTION;

pub const MODULE: AppModule = AppModule {
    name: "tahoe",
    version: 1,
    title: "Distributed File Storage (Tahoe-LAFS)",
    description: &[
        "Tahoe-LAFS is a decentralized secure file storage system. It uses provider independent security to store files over a distributed network of storage nodes. Even if some of the nodes fail, your files can be retrieved from the remaining nodes.",
        "This box hosts a storage node and an introducer by default. Additional introducers can be added, which will introduce this node to the other storage nodes.",
        "When enabled, the Tahoe-LAFS storage node's web interface will be available from /tahoe.",
    ],
    depends: &["apps"],
    managed_packages: &["tahoe-lafs"],
    action: ACTION,
    service: Some(ServiceSpec {
        unit: "tahoe-lafs",
        webserver_config: Some("tahoe-plinth"),
        ports: &["http", "https"],
        is_external: true,
    }),
    menu: MenuEntry {
        section: "apps",
        icon: "glyphicon-hdd",
        url_name: "tahoe:index",
    },
    shortcut: Some(ShortcutSpec {
        url: "/tahoe",
        login_required: true,
    }),
    setup_steps: &[
        SetupStep {
            name: "post",
            args: &["enable"],
            run_as: RunAs::Superuser,
        },
        SetupStep {
            name: "create-introducer",
            args: &["create-introducer"],
            run_as: RunAs::ServiceAccount,
        },
        SetupStep {
            name: "create-storage-node",
            args: &["create-storage-node"],
            run_as: RunAs::ServiceAccount,
        },
    ],
};
