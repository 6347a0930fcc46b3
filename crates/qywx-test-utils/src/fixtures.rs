// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plaintext callback payloads as the platform delivers them.

/// Corp id used across fixtures.
pub const CORP_ID: &str = "wx5823bf96d3bd56c7";

/// Suite id used across fixtures.
pub const SUITE_ID: &str = "tj9a1b2c3d4e5f6789";

/// Callback signing token used across fixtures.
pub const CALLBACK_TOKEN: &str = "QDG6eK";

/// A text message sent to agent 218.
pub const TEXT_MESSAGE: &str = "<xml>\
<ToUserName><![CDATA[wx5823bf96d3bd56c7]]></ToUserName>\
<FromUserName><![CDATA[zhangsan]]></FromUserName>\
<CreateTime>1409659813</CreateTime>\
<MsgType><![CDATA[text]]></MsgType>\
<Content><![CDATA[hello <b>world</b> ]]]]><![CDATA[> done]]></Content>\
<MsgId>4561255354251345929</MsgId>\
<AgentID>218</AgentID>\
</xml>";

/// A location message.
pub const LOCATION_MESSAGE: &str = "<xml>\
<ToUserName><![CDATA[wx5823bf96d3bd56c7]]></ToUserName>\
<FromUserName><![CDATA[zhangsan]]></FromUserName>\
<CreateTime>1409659813</CreateTime>\
<MsgType><![CDATA[location]]></MsgType>\
<Location_X>23.134521</Location_X>\
<Location_Y>113.358803</Location_Y>\
<Scale>20</Scale>\
<Label><![CDATA[Guangzhou]]></Label>\
<MsgId>1234567890123456</MsgId>\
<AgentID>1</AgentID>\
</xml>";

/// A menu click event.
pub const CLICK_EVENT: &str = "<xml>\
<ToUserName><![CDATA[wx5823bf96d3bd56c7]]></ToUserName>\
<FromUserName><![CDATA[lisi]]></FromUserName>\
<CreateTime>1408091189</CreateTime>\
<MsgType><![CDATA[event]]></MsgType>\
<Event><![CDATA[click]]></Event>\
<EventKey><![CDATA[V1001_TODAY_MUSIC]]></EventKey>\
<AgentID>1</AgentID>\
</xml>";

/// A scan-code push event.
pub const SCANCODE_EVENT: &str = "<xml>\
<ToUserName><![CDATA[wx5823bf96d3bd56c7]]></ToUserName>\
<FromUserName><![CDATA[lisi]]></FromUserName>\
<CreateTime>1408090502</CreateTime>\
<MsgType><![CDATA[event]]></MsgType>\
<Event><![CDATA[scancode_push]]></Event>\
<EventKey><![CDATA[6]]></EventKey>\
<ScanCodeInfo><ScanType><![CDATA[qrcode]]></ScanType>\
<ScanResult><![CDATA[1]]></ScanResult>\
</ScanCodeInfo>\
<AgentID>1</AgentID>\
</xml>";

/// A photo-picker event carrying two pictures.
pub const PIC_EVENT: &str = "<xml>\
<ToUserName><![CDATA[wx5823bf96d3bd56c7]]></ToUserName>\
<FromUserName><![CDATA[lisi]]></FromUserName>\
<CreateTime>1408090651</CreateTime>\
<MsgType><![CDATA[event]]></MsgType>\
<Event><![CDATA[pic_sysphoto]]></Event>\
<EventKey><![CDATA[6]]></EventKey>\
<SendPicsInfo><Count>2</Count>\
<PicList>\
<item><PicMd5Sum><![CDATA[1b5f7c23b5bf75682a53e7b6d163e185]]></PicMd5Sum></item>\
<item><PicMd5Sum><![CDATA[8a9b0c1d2e3f40516273849a0b1c2d3e]]></PicMd5Sum></item>\
</PicList>\
</SendPicsInfo>\
<AgentID>1</AgentID>\
</xml>";

/// A batch job completion event.
pub const BATCH_JOB_EVENT: &str = "<xml>\
<ToUserName><![CDATA[wx5823bf96d3bd56c7]]></ToUserName>\
<FromUserName><![CDATA[sys]]></FromUserName>\
<CreateTime>1425284517</CreateTime>\
<MsgType><![CDATA[event]]></MsgType>\
<Event><![CDATA[batch_job_result]]></Event>\
<BatchJob><JobId><![CDATA[S0MrnndvRG5fadSlLwiBqiDDbM143UqTmKP3152FZk4]]></JobId>\
<JobType><![CDATA[sync_user]]></JobType>\
<ErrCode>0</ErrCode>\
<ErrMsg><![CDATA[ok]]></ErrMsg>\
</BatchJob>\
</xml>";

/// A message of a kind the client does not understand.
pub const UNKNOWN_MESSAGE: &str = "<xml>\
<ToUserName><![CDATA[wx5823bf96d3bd56c7]]></ToUserName>\
<FromUserName><![CDATA[zhangsan]]></FromUserName>\
<CreateTime>1409659813</CreateTime>\
<MsgType><![CDATA[sticker]]></MsgType>\
</xml>";

/// A suite ticket push.
pub const SUITE_TICKET: &str = "<xml>\
<SuiteId><![CDATA[tj9a1b2c3d4e5f6789]]></SuiteId>\
<InfoType><![CDATA[suite_ticket]]></InfoType>\
<TimeStamp>1403610513</TimeStamp>\
<SuiteTicket><![CDATA[asdfasfdasdfasdf]]></SuiteTicket>\
</xml>";

/// A suite authorization change notice.
pub const SUITE_CHANGE_AUTH: &str = "<xml>\
<SuiteId><![CDATA[tj9a1b2c3d4e5f6789]]></SuiteId>\
<InfoType><![CDATA[change_auth]]></InfoType>\
<TimeStamp>1403610513</TimeStamp>\
<AuthCorpId><![CDATA[wxf8b4f85f3a794e77]]></AuthCorpId>\
</xml>";
