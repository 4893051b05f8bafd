//! Embedded scripts rendered with Tera.
//!
//! The provisioning script enumerates bundle fields through their environment
//! variable prefixes, so the prefixes are template variables fed from the same
//! constants the binder uses.

use tera::{Context as TeraContext, Tera};

use crate::constants::{CREDENTIAL_ENV_PREFIX, CREDENTIAL_FILE_ENV_PREFIX, PARAMETER_ENV_PREFIX};
use crate::core::{ArmError, Result};

/// Provisioning script, one command per line.
///
/// `${1}` is the porter version and `${2}` the installation name, both passed
/// as script arguments.
const DEPLOYMENT_SCRIPT: &str = r##"set -euxo pipefail
PORTER_HOME=${HOME}/.porter
PORTER_URL=https://cdn.porter.sh
PORTER_VERSION=${1}
mkdir -p ${PORTER_HOME}
curl -fsSLo ${PORTER_HOME}/porter ${PORTER_URL}/${PORTER_VERSION}/porter-linux-amd64
chmod +x ${PORTER_HOME}/porter
export PATH="${PORTER_HOME}:${PATH}"
${PORTER_HOME}/porter plugin install azure --version $PORTER_VERSION
echo 'default-storage-plugin = "azure.table"' > ${PORTER_HOME}/config.toml
cat ${PORTER_HOME}/config.toml
DOWNLOAD_LOCATION=$( curl -sL https://api.github.com/repos/deislabs/cnab-azure-driver/releases/latest | jq '.assets[]|select(.name=="cnab-azure-linux-amd64").browser_download_url' -r)
mkdir -p ${HOME}/.cnab-azure-driver
curl -sSLo ${HOME}/.cnab-azure-driver/cnab-azure ${DOWNLOAD_LOCATION}
chmod +x ${HOME}/.cnab-azure-driver/cnab-azure
export PATH=${HOME}/.cnab-azure-driver:${PATH}
set +e
INSTANCE=$(${HOME}/.porter/porter show "${2}" -o json)
set -e
ACTION='upgrade'
if [[ -z ${INSTANCE} ]]; then ACTION='install'; fi
export CNAB_ACTION=${ACTION}
SUFFIX=
PARAMSFILE=$(mktemp)
PARAMS=" -p ${PARAMSFILE}"
echo {\"Name\": \"${2}\" , > ${PARAMSFILE}
echo \"Parameters\":[ >> ${PARAMSFILE}
for env_var in ${!{{ param_prefix }}@};do NAME=${env_var#{{ param_prefix }}};echo ${SUFFIX}  >> ${PARAMSFILE};echo {\"Name\":\"$NAME\" , >> ${PARAMSFILE};echo \"Source\": { >> ${PARAMSFILE};echo \"Env\": \"${env_var}\" >> ${PARAMSFILE};echo }} >> ${PARAMSFILE}; if [[ -z ${SUFFIX} ]];then SUFFIX=','; fi;  done
echo ]} >> ${PARAMSFILE}
cat ${PARAMSFILE}
CREDS=
SUFFIX=
for env_var in ${!{{ cred_file_prefix }}@};do NAME=${env_var#{{ cred_file_prefix }}};echo ${!env_var}|base64 -d > /tmp/${NAME}; done
if [[  ! -z  ${!{{ cred_prefix }}@} ]];then CREDSFILE=$(mktemp);CREDS=" --cred ${CREDSFILE}";echo {\"Name\": \"${2}\" , > ${CREDSFILE};echo \"Credentials\":[ >> ${CREDSFILE}; for env_var in ${!{{ cred_prefix }}@};do NAME=${env_var#{{ cred_prefix }}};echo ${SUFFIX}>> ${CREDSFILE};if [[ ${NAME} = {{ file_marker }}* ]];then NAME=${NAME#{{ file_marker }}};fi;echo {\"Name\":\"$NAME\" , >> ${CREDSFILE};echo \"Source\": { >> ${CREDSFILE};if [[ ${env_var} = {{ cred_file_prefix }}* ]];then echo \"Path\": \"/tmp/${NAME}\" >> ${CREDSFILE};else echo \"Env\": \"${env_var}\" >> ${CREDSFILE};fi; echo }} >> ${CREDSFILE}; if [[ -z ${SUFFIX} ]];then SUFFIX=','; fi;  done;echo ]} >> ${CREDSFILE};fi
TAG={{ bundle_tag }}
porter bundle ${ACTION} "${2}" ${PARAMS} ${CREDS} --tag ${TAG} -d azure
OUTPUTS=$(porter inst outputs list -i "${2}" -o json)
echo OUTPUTS: ${OUTPUTS}
if [[ -z ${OUTPUTS} ]]; then OUTPUTS='[]'; fi
echo ${OUTPUTS}|jq '{BundleOutputs: .}' > ${AZ_SCRIPTS_OUTPUT_PATH}
"##;

/// Caddy configuration of the custom provider TLS front end, as a template expression.
///
/// The host name is only known at deployment time, so the file is assembled
/// with `concat` and handed to the container group base64 encoded.
const CADDYFILE: &str = r##"[base64(concat('
{
	debug
}
',variables('endPointDNSPrefix'),'.',parameters('location'),'.azurecontainer.io {
	log {
		output stdout
		format console
		level debug
	}
	reverse_proxy {
		to :{{ port }}
	}
{%- if trusted_certs %}
	tls {
		client_auth {
			mode require_and_verify
{%- for cert in trusted_certs %}
			trusted_leaf_cert {{ cert }}
{%- endfor %}
		}
	}
{%- endif %}
}
'))]"##;

/// Render the provisioning script as a single `;` separated line.
///
/// # Errors
///
/// Returns [`ArmError::TemplateRenderError`] if rendering fails.
pub fn render_deployment_script(bundle_tag: &str) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("param_prefix", PARAMETER_ENV_PREFIX);
    context.insert("cred_prefix", CREDENTIAL_ENV_PREFIX);
    context.insert("cred_file_prefix", CREDENTIAL_FILE_ENV_PREFIX);
    context.insert("file_marker", &CREDENTIAL_FILE_ENV_PREFIX[CREDENTIAL_ENV_PREFIX.len()..]);
    context.insert("bundle_tag", bundle_tag);

    let rendered = render("deployment script", DEPLOYMENT_SCRIPT, &context)?;
    Ok(rendered
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("{line};"))
        .collect())
}

/// Render the Caddyfile expression, requiring client certificates when any are trusted.
///
/// # Errors
///
/// Returns [`ArmError::TemplateRenderError`] if rendering fails.
pub fn render_caddyfile(port: u16, trusted_certs: &[String]) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("port", &port);
    context.insert("trusted_certs", trusted_certs);
    render("Caddyfile", CADDYFILE, &context)
}

fn render(name: &str, source: &str, context: &TeraContext) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(name, source).map_err(|e| render_error(name, &e))?;
    tera.render(name, context).map_err(|e| render_error(name, &e))
}

/// Flatten a Tera error and its causes into one message.
fn render_error(name: &str, error: &tera::Error) -> ArmError {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }

    ArmError::TemplateRenderError {
        name: name.to_string(),
        reason: messages.join(": "),
    }
}
