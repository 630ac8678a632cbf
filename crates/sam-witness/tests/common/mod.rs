//! Shared fixtures: 32 participant addresses, the signer sits at position 5.
#![allow(dead_code)]

use sam_witness::{WitnessConfig, WitnessRequest};

pub const TREE_HEIGHT: usize = 5;

pub const SIGNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const SIGNER_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const SIGNER_POSITION: u64 = 5;

/// Path bits `[1, 0, 1, 0, 0]` packed first-bit-most-significant
pub const SIGNER_PACKED_PATH: u64 = 0b10100;

pub const MSG_HASH: &str = "0x104ffbad9450b48089e3d917b63fc13c88ddac7ed4a02bc03512d883f0666c8b";

/// Addresses of private keys 1..=32, with the signer replacing key 6
pub const PARTICIPANTS: [&str; 32] = [
    "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf",
    "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF",
    "0x6813Eb9362372EEF6200f3b1dbC3f819671cBA69",
    "0x1efF47bc3a10a45D4B230B5d10E37751FE6AA718",
    "0xe1AB8145F7E55DC933d51a18c793F901A3A0b276",
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
    "0xd41c057fd1c78805AAC12B0A94a405c0461A6FBb",
    "0xF1F6619B38A98d6De0800F1DefC0a6399eB6d30C",
    "0xF7Edc8FA1eCc32967F827C9043FcAe6ba73afA5c",
    "0x4CCeBa2d7D2B4fdcE4304d3e09a1fea9fbEb1528",
    "0x3DA8D322CB2435dA26E9C9fEE670f9fB7Fe74E49",
    "0xDbc23AE43a150ff8884B02Cea117b22D1c3b9796",
    "0x68E527780872cda0216Ba0d8fBD58b67a5D5e351",
    "0x5A83529ff76Ac5723A87008c4D9B436AD4CA7d28",
    "0x8735015837bD10e05d9cf5EA43A2486Bf4Be156F",
    "0xfaE394561e33e242c551d15D4625309EA4c0B97f",
    "0x252Dae0A4b9d9b80F504F6418acd2d364C0c59cD",
    "0x79196B90D1E952C5A43d4847CAA08d50b967c34A",
    "0x4bd1280852Cadb002734647305AFC1db7ddD6Acb",
    "0x811da72aCA31e56F770Fc33DF0e45fD08720E157",
    "0x157bFBEcd023fD6384daD2Bded5DAD7e27Bf92E4",
    "0x37dA28C050E3c0A1c0aC3BE97913EC038783dA4C",
    "0x3Bc8287F1D872df4217283b7920D363F13Cf39D8",
    "0xf4e2B0fcbd0DC4b326d8A52B718A7bb43BdBd072",
    "0x9a5279029e9A2D6E787c5A09CB068AB3D45e209d",
    "0xc39677F5F47d5fE65ab24e66750e8FCa127c15BE",
    "0x1dc728786E09F862E39Be1f39dD218EE37feB68D",
    "0x636CC65783084b9F370789c90F733DBBeb88925D",
    "0x4a7A7c2E09209dbE44A582cD92b0eDd7129E74be",
    "0xA56160A359F2EAa66f5c9df5245542B07339A9a6",
    "0x6b09D6433a379752157fD1a9E537c5CAe5fa3168",
    "0x32E77DE0D74a5C7AF861aAEd324c6a4c488142a8",
];

/// Root over all 32 participants
pub const FULL_ROOT: &str =
    "3049898682081909243511089755409387418250526723441275022907898620298575385079";

pub const FULL_PATH: [&str; 5] = [
    "4490864165065958210670129079683128208873732214411162261543825470017587527417",
    "7178691916977519033623447076136348846745428252783428871536564466554554828147",
    "8223612354762707403875915906975168341457484188524586239804720551185373265464",
    "458738656454714421327423824797615958200153583291918431329371500616034640672",
    "11916701777222784885977761245959385459911276213569693454745870604802680393839",
];

/// Root over the first 10 participants, padded to 32 slots
pub const TRUNCATED_ROOT: &str =
    "10902014847856276189794051717572745869789095592353899557252635815379763810962";

pub const TRUNCATED_PATH: [&str; 5] = [
    "4490864165065958210670129079683128208873732214411162261543825470017587527417",
    "7178691916977519033623447076136348846745428252783428871536564466554554828147",
    "8223612354762707403875915906975168341457484188524586239804720551185373265464",
    "11000264477212197611414923128195229499481545457518512487976296490225024999201",
    "18097266179879782427361438755277450939722755112152115227098348943187633376449",
];

pub const R_HEX: &str = "a34c0d415cdb01e266d8c3fa6fce44839589177dc2244839638847f340cdeec4";
pub const S_HEX: &str = "71c66105e9fc3e2ee1a50f10f079c4282be8b84b42d0c7a25c102dc47996829b";
pub const PUB_X_HEX: &str = "8318535b54105d4a7aae60c08fc45f9687181b4fdfc625bd1a753fa7397fed75";
pub const PUB_Y_HEX: &str = "3547f11ca8696646f2f3acb08e31016afac23e630c5d11f59f61fef57b0d2aa5";

/// 64x4 registers, least significant first
pub const R_CHUNKS: [&str; 4] = [
    "7172061516677377732",
    "10775169412356130873",
    "7410888667223180419",
    "11766794500794155490",
];
pub const S_CHUNKS: [&str; 4] = [
    "6633852572993487515",
    "3163981371610810274",
    "16259418595119449128",
    "8198346849702919726",
];
pub const MSG_CHUNKS: [&str; 4] = [
    "3824357094776532107",
    "9862228419744377792",
    "9936023898774552892",
    "1175434750703219840",
];
pub const PUB_X_CHUNKS: [&str; 4] = [
    "1906500004718046581",
    "9734560624431998397",
    "8840109498736861078",
    "9446391870127103306",
];
pub const PUB_Y_CHUNKS: [&str; 4] = [
    "11484740855056378533",
    "18069073250093961717",
    "17506526050819047786",
    "3839302312743495238",
];

pub fn signer_key() -> Vec<u8> {
    hex::decode(SIGNER_KEY).unwrap()
}

pub fn participants() -> Vec<String> {
    PARTICIPANTS.iter().map(ToString::to_string).collect()
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

pub fn request() -> WitnessRequest {
    WitnessRequest::new(signer_key(), participants(), MSG_HASH)
}

pub fn config() -> WitnessConfig {
    WitnessConfig::with_height(TREE_HEIGHT)
}

/// Route library spans to the test output when `RUST_LOG` is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
