use crate::ports::{CodeGenerator, GeneratorRequest};
use anyhow::Context;
use sdkbuilder_types::{Environment, vars};
use std::process::Command;
use tracing::{debug, info};

const JVM_FLAGS: [&str; 3] = [
    "-XX:MaxPermSize=256M",
    "-Xmx1024M",
    "-DloggerPath=conf/log4j.properties",
];

/// Runs the swagger-codegen jar with `java`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaCodeGenerator;

impl JavaCodeGenerator {
    /// Full argument list passed to `java`.
    pub fn command_args(
        request: &GeneratorRequest,
        env: &Environment,
    ) -> anyhow::Result<Vec<String>> {
        let jar = request
            .jar_path
            .as_ref()
            .context("settings.swaggerCodegen.jarPath must be set to run the generator")?;

        let mut args: Vec<String> = env
            .get(vars::JAVA_OPTS)
            .map(|opts| opts.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        args.extend(JVM_FLAGS.iter().map(|f| f.to_string()));
        args.extend([
            "-jar".to_string(),
            jar.to_string(),
            "generate".to_string(),
            "-i".to_string(),
            request.input.to_string(),
            "-l".to_string(),
            request.language.clone(),
            "-o".to_string(),
            request.output_dir.to_string(),
        ]);
        if let Some(config) = &request.config_file {
            args.extend(["-c".to_string(), config.to_string()]);
        }
        args.extend(["-t".to_string(), request.template_dir.to_string()]);
        args.extend(request.extra_options.iter().cloned());
        Ok(args)
    }
}

impl CodeGenerator for JavaCodeGenerator {
    fn generate(&self, request: &GeneratorRequest, env: &Environment) -> anyhow::Result<()> {
        let args = Self::command_args(request, env)?;
        info!("Running swagger-codegen...");
        debug!(command = %format!("java {}", args.join(" ")), "generator command");

        let status = Command::new("java")
            .args(&args)
            .envs(env.iter())
            .status()
            .context("run java")?;
        if !status.success() {
            anyhow::bail!("swagger-codegen failed with {}", status);
        }
        Ok(())
    }
}
