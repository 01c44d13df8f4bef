//! Compute instances and the boot script that mounts the shared file system.

use efs_stack_common::{SubnetClass, intrinsic};
use serde_json::{Value, json};

use crate::domain::naming::ConstructPath;

pub const MOUNT_PATH: &str = "/mnt/efs";
pub const EFS_CLIENT_PACKAGE: &str = "amazon-efs-utils";
pub const AMAZON_LINUX_SSM_PARAMETER: &str =
    "/aws/service/ami-amazon-linux-latest/amzn-ami-hvm-x86_64-gp2";

const SHEBANG: &str = "#!/bin/bash";

/// Piece of a boot command: literal text, or the file system id that the
/// provider assigns at apply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    FileSystemId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootCommand(pub Vec<Fragment>);

impl BootCommand {
    fn text(s: &str) -> Self {
        Self(vec![Fragment::Text(s.to_string())])
    }
}

/// Ordered shell commands run once at first boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootScript {
    pub commands: Vec<BootCommand>,
}

impl BootScript {
    /// Install the EFS client, create `mount_path`, and mount the file system
    /// over TLS.
    #[must_use]
    pub fn efs_mount(mount_path: &str) -> Self {
        Self {
            commands: vec![
                BootCommand::text("sudo su - ec2-user"),
                BootCommand::text(&format!("sudo yum install -y {EFS_CLIENT_PACKAGE}")),
                BootCommand::text(&format!("sudo mkdir -p {mount_path}")),
                BootCommand(vec![
                    Fragment::Text("sudo mount -t efs -o tls ".to_string()),
                    Fragment::FileSystemId,
                    Fragment::Text(format!(":/ {mount_path}")),
                ]),
            ],
        }
    }

    #[must_use]
    pub fn references_file_system(&self) -> bool {
        self.commands
            .iter()
            .any(|c| c.0.contains(&Fragment::FileSystemId))
    }

    /// `UserData` value: `Fn::Base64` of an `Fn::Join` that splices in a
    /// `Ref` to `fs_logical_id`.
    #[must_use]
    pub fn to_cfn(&self, fs_logical_id: &str) -> Value {
        let mut parts: Vec<Value> = Vec::new();
        let mut buf = String::from(SHEBANG);
        for cmd in &self.commands {
            buf.push('\n');
            for frag in &cmd.0 {
                match frag {
                    Fragment::Text(t) => buf.push_str(t),
                    Fragment::FileSystemId => {
                        parts.push(json!(std::mem::take(&mut buf)));
                        parts.push(intrinsic::reference(fs_logical_id));
                    }
                }
            }
        }
        if !buf.is_empty() {
            parts.push(json!(buf));
        }
        intrinsic::base64(intrinsic::join("", parts))
    }
}

/// Machine image resolved from a public SSM parameter at apply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineImage {
    pub ssm_parameter: String,
}

impl MachineImage {
    #[must_use]
    pub fn amazon_linux() -> Self {
        Self {
            ssm_parameter: AMAZON_LINUX_SSM_PARAMETER.to_string(),
        }
    }

    /// Name of the template parameter carrying the image id.
    #[must_use]
    pub fn parameter_name(&self) -> String {
        ConstructPath::new(&["SsmParameterValue", &self.ssm_parameter, "Parameter"]).logical_id()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeInstance {
    pub path: ConstructPath,
    pub subnet_class: SubnetClass,
    pub associate_public_ip: bool,
    pub instance_type: String,
    pub image: MachineImage,
    /// Path of the shared compute identity.
    pub identity: ConstructPath,
    pub boot_script: BootScript,
}

impl ComputeInstance {
    /// Declare the instance variant for `class`. Only placement and public
    /// address association differ between variants.
    #[must_use]
    pub fn define(class: SubnetClass, instance_type: &str, identity: &ConstructPath) -> Self {
        let name = match class {
            SubnetClass::Public => "Ec2InstancePublic",
            SubnetClass::PrivateWithEgress => "Ec2InstancePrivate",
        };
        Self {
            path: ConstructPath::new(&[name]),
            subnet_class: class,
            associate_public_ip: class.maps_public_ip(),
            instance_type: instance_type.to_string(),
            image: MachineImage::amazon_linux(),
            identity: identity.clone(),
            boot_script: BootScript::efs_mount(MOUNT_PATH),
        }
    }

    #[must_use]
    pub fn logical_id(&self) -> String {
        self.path.logical_id()
    }
}
